//! Configuration management for expensify.
//!
//! Loads configuration from ${EXPENSIFY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default base URL for the expense API (all endpoint paths are relative to it).
pub const DEFAULT_API_BASE_URL: &str = "https://expensify-api-8g94.onrender.com/api/v1";

/// Environment variable overriding the API base URL.
pub const API_BASE_URL_ENV: &str = "EXPENSIFY_API_BASE_URL";

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for expensify configuration and data files.
    //!
    //! EXPENSIFY_HOME resolution order:
    //! 1. EXPENSIFY_HOME environment variable (if set)
    //! 2. ~/.config/expensify (default)

    use std::path::PathBuf;

    /// Returns the expensify home directory.
    ///
    /// Falls back to the current directory when no home directory can be determined.
    pub fn expensify_home() -> PathBuf {
        if let Ok(home) = std::env::var("EXPENSIFY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".expensify"),
            |h| h.join(".config").join("expensify"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        expensify_home().join("config.toml")
    }

    /// Returns the path to the persisted session store.
    pub fn session_path() -> PathBuf {
        expensify_home().join("session.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the expense API (overridden by `EXPENSIFY_API_BASE_URL`)
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u64,

    /// Log filter directive, e.g. "info" or "expensify_core=debug"
    pub log_level: Option<String>,

    /// Optional log file; logs go to stderr when unset
    pub log_file: Option<String>,
}

impl Config {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// Trailing slashes are stripped so endpoint paths can be appended directly.
    pub fn effective_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var(API_BASE_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        if let Some(config_url) = self.api_base_url.as_deref() {
            let trimmed = config_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        Ok(DEFAULT_API_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: None,
            log_file: None,
        }
    }
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}
