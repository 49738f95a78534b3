//! Configuration file and path resolution.
//!
//! An optional `config.toml` in the platform config directory supplies
//! defaults; command-line flags override it. Every field is optional.
//!
//! ```toml
//! data_file = "/home/me/confab/data.json"
//! log_file = "/tmp/confab.log"
//! log_filter = "confab=debug"
//! color = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_DIR: &str = "confab";
const CONFIG_FILENAME: &str = "config.toml";
const DATA_FILENAME: &str = "data.json";
const LOG_FILENAME: &str = "confab.log";
const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// PATHS
// ============================================================================

/// Returns the default config file path.
///
/// On Linux: ~/.config/confab/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

/// Returns the directory holding the dataset and log by default.
///
/// On Linux: ~/.local/share/confab/
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

// ============================================================================
// FILE FORMAT
// ============================================================================

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub color: Option<bool>,
}

/// Values given on the command line; `None` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub no_color: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub color: bool,
}

impl Config {
    /// Load `path`, or defaults if it does not exist.
    ///
    /// # Errors
    /// If the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load() -> Result<Config, ConfigError> {
        Config::load_from_path(&default_config_path())
    }

    /// Apply `overrides` and fill remaining gaps from `data_dir`.
    pub fn resolve(self, overrides: Overrides, data_dir: &Path) -> Settings {
        Settings {
            data_file: overrides
                .data_file
                .or(self.data_file)
                .unwrap_or_else(|| data_dir.join(DATA_FILENAME)),
            log_file: self.log_file.unwrap_or_else(|| data_dir.join(LOG_FILENAME)),
            log_filter: self
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            color: !overrides.no_color && self.color.unwrap_or(true),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
