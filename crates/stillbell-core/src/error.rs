//! Core error types for stillbell-core.
//!
//! This module defines the error hierarchy using thiserror. Construction
//! and validation errors surface synchronously; once inputs are valid the
//! decision engine never fails.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stillbell-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value passed to a constructor or conversion is out of range
    /// or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load the settings file
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save the settings file
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The active weekday set is empty. Scheduling would search for the
    /// next active day forever, so this is rejected up front.
    #[error("No active weekdays configured; the bell would never ring")]
    NoActiveWeekdays,

    /// Failed to parse the settings file
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),
}

/// Statistics-store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the statistics database
    #[error("Failed to open statistics database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
