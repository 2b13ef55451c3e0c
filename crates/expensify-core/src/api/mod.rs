//! HTTP client for the expense API.
//!
//! Unauthenticated endpoints (login, signup, OTP) and the token refresh live
//! in [`auth`]; bearer-authenticated expense endpoints in [`expenses`] go
//! through the [`SessionManager`](crate::manager::SessionManager).

pub mod auth;
pub mod expenses;

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;

use crate::config::{Config, DEFAULT_API_BASE_URL};
use crate::error::ClientError;

pub const LOGIN_PATH: &str = "/login";
pub const SIGN_UP_PATH: &str = "/signUp";
pub const SEND_OTP_PATH: &str = "/sendOTP";
pub const VERIFY_OTP_PATH: &str = "/verifyOTPAndSignup";
pub const RESEND_OTP_PATH: &str = "/resendOTP";
pub const REFRESH_TOKEN_PATH: &str = "/refresh-token";
pub const EXPENSES_PATH: &str = "/expenses";
pub const STATS_PATH: &str = "/expenses/stats";

/// Expense API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `EXPENSIFY_BLOCK_REAL_API=1` and `base_url` is the production API.
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        #[cfg(test)]
        assert!(
            base_url != DEFAULT_API_BASE_URL,
            "Tests must not use the production expense API!\n\
             Point the client at a mock server (e.g., wiremock)."
        );

        #[cfg(not(test))]
        if std::env::var("EXPENSIFY_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == DEFAULT_API_BASE_URL
        {
            panic!(
                "EXPENSIFY_BLOCK_REAL_API=1 but trying to use the production expense API!\n\
                 Set EXPENSIFY_API_BASE_URL to a mock server."
            );
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { base_url, http })
    }

    /// Creates a client from configuration (env overrides applied).
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.effective_base_url()?;
        Self::new(&base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path (which may carry a query string).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request. Only transport failures are errors; every HTTP status
    /// comes back as a response for the caller to interpret.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, authorized = bearer.is_some(), "sending request");
        request.send().await.map_err(|err| {
            tracing::warn!(%method, %url, error = %err, "request failed without a response");
            ClientError::network(&err)
        })
    }

    /// POSTs an unauthenticated JSON body.
    pub(crate) async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(Method::POST, path, Some(body), None).await
    }
}

/// Reads a success body as `T`.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let body = response
        .text()
        .await
        .map_err(|err| ClientError::network(&err))?;
    serde_json::from_str(&body).map_err(|err| {
        tracing::warn!(error = %err, "response body did not match the expected shape");
        ClientError::parse(err.to_string())
    })
}
