//! Session persistence.
//!
//! A session is a bearer token plus the user it belongs to. Both live in the
//! key-value store under [`TOKEN_KEY`] and [`USER_KEY`] and are always written
//! and cleared together. Tokens are never logged or displayed in full.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::KeyValueStore;

/// Store key holding the raw bearer token.
pub const TOKEN_KEY: &str = "authToken";
/// Store key holding the JSON-encoded user.
pub const USER_KEY: &str = "user";

/// The authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Same user, new token.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: self.user.clone(),
        }
    }
}

/// Reads the session from the store.
///
/// Returns `None` unless both entries are present, non-empty and parseable.
/// Store failures are logged and treated as "not authenticated".
pub fn load_session(store: &impl KeyValueStore) -> Option<Session> {
    let token = match store.get(TOKEN_KEY) {
        Ok(Some(token)) if !token.trim().is_empty() => token,
        Ok(_) => return None,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to read token from store");
            return None;
        }
    };

    let raw_user = match store.get(USER_KEY) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            tracing::debug!("token present without user; treating as signed out");
            return None;
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to read user from store");
            return None;
        }
    };

    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => Some(Session { token, user }),
        Err(err) => {
            tracing::warn!(error = %err, "stored user is not valid JSON");
            None
        }
    }
}

/// Writes both session entries.
///
/// If the user entry cannot be written the token entry is rolled back so the
/// store never holds half a session.
pub fn save_session(store: &impl KeyValueStore, session: &Session) -> Result<()> {
    let user_json = serde_json::to_string(&session.user).context("Failed to serialize user")?;

    store
        .set(TOKEN_KEY, &session.token)
        .context("Failed to save token")?;
    if let Err(err) = store.set(USER_KEY, &user_json) {
        if let Err(rollback_err) = store.remove(TOKEN_KEY) {
            tracing::error!(
                error = %format!("{rollback_err:#}"),
                "failed to roll back token after user write failed"
            );
        }
        return Err(err.context("Failed to save user"));
    }

    tracing::debug!(token = %mask_token(&session.token), "session saved");
    Ok(())
}

/// Persists a refreshed token for an existing session.
pub fn save_token(store: &impl KeyValueStore, token: &str) -> Result<()> {
    store.set(TOKEN_KEY, token).context("Failed to save token")
}

/// Removes both session entries.
///
/// Returns whether a complete session existed beforehand.
pub fn clear_session(store: &impl KeyValueStore) -> Result<bool> {
    let existed = load_session(store).is_some();
    let token_result = store.remove(TOKEN_KEY).context("Failed to remove token");
    let user_result = store.remove(USER_KEY).context("Failed to remove user");
    token_result?;
    user_result?;
    Ok(existed)
}

/// Masks a token for display.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}
