//! Authentication endpoints: login, signup (plain and OTP-based), token refresh.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{
    ApiClient, LOGIN_PATH, REFRESH_TOKEN_PATH, RESEND_OTP_PATH, SEND_OTP_PATH, SIGN_UP_PATH,
    VERIFY_OTP_PATH, parse_json,
};
use crate::error::ClientError;
use crate::session::{Session, User, mask_token};
use crate::validation::{LoginForm, SignupForm};

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageResponse {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VerifyResponse {
    token: Option<String>,
    user: Option<User>,
}

impl ApiClient {
    /// `POST /login`. Returns the new (unsaved) session.
    pub async fn login(&self, form: &LoginForm) -> Result<Session, ClientError> {
        let body = json!({ "email": form.email, "password": form.password });
        let response = self.post_json(LOGIN_PATH, &body).await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response, "Login failed").await);
        }

        let auth: AuthResponse = parse_json(response).await?;
        if auth.token.trim().is_empty() {
            return Err(ClientError::parse("login response carried an empty token"));
        }
        tracing::info!(email = %auth.user.email, "logged in");
        Ok(Session::new(auth.token, auth.user))
    }

    /// `POST /signUp`: single-step registration without OTP.
    pub async fn sign_up(&self, form: &SignupForm) -> Result<String, ClientError> {
        let body = json!({ "name": form.name, "email": form.email, "password": form.password });
        let response = self.post_json(SIGN_UP_PATH, &body).await?;
        message_or(response, "Signup failed", "Sign up successful!").await
    }

    /// `POST /sendOTP`: starts OTP signup; the server emails a code.
    pub async fn send_otp(&self, form: &SignupForm) -> Result<String, ClientError> {
        let body = json!({ "name": form.name, "email": form.email, "password": form.password });
        let response = self.post_json(SEND_OTP_PATH, &body).await?;
        message_or(response, "Failed to send OTP", "OTP sent to your email").await
    }

    /// `POST /resendOTP`.
    pub async fn resend_otp(&self, email: &str) -> Result<String, ClientError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ClientError::validation("Please enter email"));
        }
        let response = self
            .post_json(RESEND_OTP_PATH, &json!({ "email": email }))
            .await?;
        message_or(response, "Failed to resend OTP", "OTP resent to your email").await
    }

    /// `POST /verifyOTPAndSignup`.
    ///
    /// Returns a session when the server signs the new user straight in,
    /// `None` when the user still has to log in.
    pub async fn verify_otp_and_signup(
        &self,
        form: &SignupForm,
        otp: &str,
    ) -> Result<Option<Session>, ClientError> {
        let body = json!({
            "name": form.name,
            "email": form.email,
            "password": form.password,
            "otp": otp,
        });
        let response = self.post_json(VERIFY_OTP_PATH, &body).await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response, "OTP verification failed").await);
        }

        let verified: VerifyResponse = parse_json(response).await.unwrap_or_default();
        match (verified.token, verified.user) {
            (Some(token), Some(user)) if !token.trim().is_empty() => {
                Ok(Some(Session::new(token, user)))
            }
            _ => Ok(None),
        }
    }

    /// `POST /refresh-token` with the current token as bearer.
    ///
    /// Any non-success status, transport failure, or malformed body is an error.
    /// The user is carried over unchanged.
    pub async fn refresh_token(&self, session: &Session) -> Result<Session, ClientError> {
        tracing::debug!(token = %mask_token(&session.token), "refreshing token");
        let response = self
            .send(Method::POST, REFRESH_TOKEN_PATH, None, Some(&session.token))
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response, "Token refresh failed").await);
        }

        let refreshed: RefreshResponse = parse_json(response).await?;
        if refreshed.token.trim().is_empty() {
            return Err(ClientError::parse("refresh response carried an empty token"));
        }
        Ok(session.with_token(refreshed.token))
    }
}

/// Success → the server's `message` (or `success_default`); failure → rejection.
async fn message_or(
    response: reqwest::Response,
    failure_fallback: &str,
    success_default: &str,
) -> Result<String, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::from_response(response, failure_fallback).await);
    }
    let parsed: MessageResponse = parse_json(response).await.unwrap_or_default();
    Ok(parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| success_default.to_string()))
}
