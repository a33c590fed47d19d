//! Core error types for pomolog-core.
//!
//! Store, configuration and validation failures each get their own enum.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a [`LogStore`](crate::storage::LogStore) write or schema call.
///
/// Read paths never surface these; they degrade to an empty history instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached at all.
    #[error("log store unreachable: {0}")]
    Unreachable(String),

    /// Credentials missing or rejected.
    #[error("log store rejected credentials: {0}")]
    Auth(String),

    /// The backend answered with a non-success status.
    #[error("log store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not finish within the configured timeout.
    #[error("log store request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// A stored row could not be read back as a session record.
    #[error("malformed log row: {0}")]
    Malformed(String),

    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to open the SQLite file.
    #[error("failed to open log database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The data directory could not be created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A duration outside its allowed range.
    #[error("{field} must be between {min} and {max} minutes, got {value}")]
    DurationOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// A mode name that is not work, break or test.
    #[error("unknown timer mode '{0}' (expected work, break or test)")]
    UnknownMode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            StoreError::Unreachable(err.to_string())
        } else if let Some(status) = err.status() {
            StoreError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Unreachable(err.to_string())
        }
    }
}
