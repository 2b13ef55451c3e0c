use std::fmt;

use serde_json::Value;

/// Message shown for transport failures (no response received).
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Message shown when the session could not be recovered.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Errors surfaced to callers of the API client and session manager.
///
/// `Display` yields the text to show the user; transport and parse details are
/// kept separately for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Invalid form input, caught before anything is sent.
    Validation(String),
    /// The server answered with a non-success status.
    Rejected { status: u16, message: String },
    /// No response was received.
    Network { details: String },
    /// A success response whose body does not match the expected shape.
    Parse { details: String },
    /// The session could not be written to local storage.
    Storage { details: String },
    /// The token was rejected and could not be refreshed; the stored session
    /// has been cleared.
    ReauthenticationRequired,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(err: &reqwest::Error) -> Self {
        Self::Network {
            details: err.to_string(),
        }
    }

    pub fn parse(details: impl Into<String>) -> Self {
        Self::Parse {
            details: details.into(),
        }
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage {
            details: format!("{err:#}"),
        }
    }

    /// Builds a rejection from a status and raw body.
    ///
    /// Uses the body's `message` field verbatim when present, otherwise `fallback`.
    pub fn rejected(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| fallback.to_string());
        Self::Rejected { status, message }
    }

    /// Consumes a non-success response into a rejection.
    pub async fn from_response(response: reqwest::Response, fallback: &str) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::rejected(status, &body, fallback)
    }

    /// True when the caller must send the user back to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::ReauthenticationRequired)
    }

    /// Extra diagnostic text not meant for the user.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Network { details } | Self::Parse { details } | Self::Storage { details } => {
                Some(details)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) | Self::Rejected { message, .. } => f.write_str(message),
            Self::Network { .. } => f.write_str(NETWORK_ERROR_MESSAGE),
            Self::Parse { .. } => f.write_str("Unexpected response from server"),
            Self::Storage { .. } => f.write_str("Failed to save login data"),
            Self::ReauthenticationRequired => f.write_str(SESSION_EXPIRED_MESSAGE),
        }
    }
}

impl std::error::Error for ClientError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_uses_server_message_verbatim() {
        let err = ClientError::rejected(
            400,
            r#"{"message":"Email already registered"}"#,
            "Signup failed",
        );
        assert_eq!(
            err,
            ClientError::Rejected {
                status: 400,
                message: "Email already registered".to_string()
            }
        );
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_rejected_falls_back_without_message() {
        let err = ClientError::rejected(500, "<html>oops</html>", "Failed to add expense");
        assert_eq!(err.to_string(), "Failed to add expense");

        let err = ClientError::rejected(422, r#"{"message":"  "}"#, "Login failed");
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_network_and_session_messages() {
        let err = ClientError::Network {
            details: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.details(), Some("connection refused"));
        assert!(!err.requires_login());

        assert!(ClientError::ReauthenticationRequired.requires_login());
        assert_eq!(
            ClientError::ReauthenticationRequired.to_string(),
            SESSION_EXPIRED_MESSAGE
        );
    }
}
