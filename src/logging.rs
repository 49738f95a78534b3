//! Tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to a file. The filter
//! comes from config unless `CONFAB_LOG` is set.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "CONFAB_LOG";

/// Pick the filter directive: a non-blank env value wins.
pub fn effective_filter(configured: &str, env: Option<String>) -> String {
    match env {
        Some(value) if !value.trim().is_empty() => value,
        _ => configured.to_string(),
    }
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path, configured_filter: &str) -> Result<(), LoggingError> {
    let filter = effective_filter(configured_filter, std::env::var(LOG_ENV).ok());
    let env_filter = EnvFilter::try_new(&filter)
        .map_err(|source| LoggingError::Filter { filter, source })?;

    let open_err = |source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}
