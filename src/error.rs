//! Error types shared across the crate.
//!
//! User input errors never appear here: prompts recover from them locally.
//! Cancellation is not an error either (see [`crate::console::signal`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a collaborator (auth or repository).
///
/// Screens reduce every variant to the same one-line notice; the detail
/// only reaches the log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dataset at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A business rule refused the command.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("user {0} is not allowed to do that")]
    Unauthorized(i64),

    /// The OS random source could not produce a salt.
    #[error("no randomness for password salt: {0}")]
    Entropy(#[from] getrandom::Error),
}

impl StoreError {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        StoreError::Rejected(reason.into())
    }
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// A candidate set was built from an empty list.
///
/// This is a defect in the calling screen, not a user input problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("candidate set must contain at least one id")]
pub struct EmptyCandidates;
