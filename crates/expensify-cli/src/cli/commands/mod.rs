//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod expenses;
pub mod stats;

use anyhow::Result;
use expensify_core::ClientError;
use expensify_core::session::Session;

use super::Manager;

/// Converts a client error into the message shown to the user.
pub(crate) fn report(err: ClientError) -> anyhow::Error {
    if let Some(details) = err.details() {
        tracing::debug!(details, "request failed");
    }
    if err.requires_login() {
        anyhow::anyhow!("{err}\nRun `expensify login` to sign in again.")
    } else {
        anyhow::Error::new(err)
    }
}

/// Loads the stored session or asks the user to log in.
pub(crate) fn require_session(manager: &Manager) -> Result<Session> {
    manager.load_session().ok_or_else(|| {
        anyhow::anyhow!(
            "{}\nRun `expensify login` to sign in.",
            expensify_core::error::SESSION_EXPIRED_MESSAGE
        )
    })
}
