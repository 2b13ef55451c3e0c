//! Session manager: the single owner of refresh-and-retry.
//!
//! Every bearer-authenticated call goes through [`SessionManager::authorized_request`].
//! Per call the flow is
//!
//! ```text
//! UNSENT -> SENT -> OK                       (any status but 401)
//!                -> AUTH_FAILED -> REFRESHING -> RETRIED    (second response returned as-is)
//!                                             -> LOGGED_OUT (store cleared)
//! ```
//!
//! There is at most one refresh and one retry per call. Concurrent calls are
//! not coordinated; each may refresh independently.

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::{self, Session, mask_token};
use crate::store::KeyValueStore;
use crate::validation::{LoginForm, SignupForm};

pub struct SessionManager<S> {
    api: ApiClient,
    store: S,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the persisted session. `None` means "not authenticated".
    pub fn load_session(&self) -> Option<Session> {
        session::load_session(&self.store)
    }

    /// Validates credentials, logs in, and persists the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let form = LoginForm::validate(email, password)?;
        let session = self.api.login(&form).await?;
        session::save_session(&self.store, &session).map_err(|err| {
            tracing::error!(error = %format!("{err:#}"), "failed to persist session after login");
            ClientError::storage(&err)
        })?;
        Ok(session)
    }

    /// Completes OTP signup; persists the session if the server returned one.
    pub async fn verify_otp_and_signup(
        &self,
        form: &SignupForm,
        otp: &str,
    ) -> Result<Option<Session>, ClientError> {
        let session = self.api.verify_otp_and_signup(form, otp).await?;
        if let Some(session) = &session {
            session::save_session(&self.store, session).map_err(|err| {
                tracing::error!(error = %format!("{err:#}"), "failed to persist session after signup");
                ClientError::storage(&err)
            })?;
        }
        Ok(session)
    }

    /// Clears the stored session. Returns whether one existed.
    pub fn logout(&self) -> Result<bool> {
        let existed = session::clear_session(&self.store)?;
        tracing::info!(existed, "logged out");
        Ok(existed)
    }

    /// Exchanges the session's token for a new one. The user is unchanged.
    pub async fn refresh(&self, session: &Session) -> Result<Session, ClientError> {
        self.api.refresh_token(session).await
    }

    /// Sends a bearer-authenticated request, refreshing once on 401.
    ///
    /// On a successful refresh `session` is updated in place (and persisted)
    /// before the single retry. If the refresh fails the stored session is
    /// cleared and [`ClientError::ReauthenticationRequired`] is returned; `session`
    /// then still holds the rejected token and must be dropped by the caller.
    /// Transport failures are returned as [`ClientError::Network`] and never retried.
    pub async fn authorized_request(
        &self,
        session: &mut Session,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .api
            .send(method.clone(), path, body, Some(&session.token))
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::info!(%method, path, "token rejected, trying to refresh");
        let refreshed = match self.refresh(session).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                tracing::warn!(error = %err, details = err.details().unwrap_or(""), "token refresh failed, signing out");
                if let Err(clear_err) = session::clear_session(&self.store) {
                    tracing::error!(error = %format!("{clear_err:#}"), "failed to clear session");
                }
                return Err(ClientError::ReauthenticationRequired);
            }
        };

        if let Err(err) = session::save_token(&self.store, &refreshed.token) {
            // The retry still uses the new token; the next load sees the old one.
            tracing::warn!(error = %format!("{err:#}"), "failed to persist refreshed token");
        }
        tracing::debug!(token = %mask_token(&refreshed.token), "token refreshed");
        *session = refreshed;

        self.api
            .send(method, path, body, Some(&session.token))
            .await
    }
}
