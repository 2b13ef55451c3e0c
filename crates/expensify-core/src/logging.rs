//! Logging initialization.
//!
//! Filter resolution order:
//! 1. `EXPENSIFY_LOG` environment variable
//! 2. `log_level` from config
//! 3. `warn`
//!
//! Output goes to stderr, or to `log_file` when configured.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_ENV: &str = "EXPENSIFY_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Resolves the filter directive string.
pub fn filter_directive(config: &Config) -> String {
    if let Ok(env) = std::env::var(LOG_ENV) {
        let trimmed = env.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    config
        .log_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Installs the global subscriber.
///
/// The returned guard must be held until exit so buffered file writes are
/// flushed. Calling this twice is a no-op for the second call.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let directive = filter_directive(config);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{directive}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config.log_file.as_deref().map(str::trim) {
        Some(log_file) if !log_file.is_empty() => {
            let path = Path::new(log_file);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
            Ok(Some(guard))
        }
        _ => {
            let _ = builder.with_writer(std::io::stderr).try_init();
            Ok(None)
        }
    }
}
