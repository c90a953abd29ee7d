//! Core error types for studyflow-core.
//!
//! Two domain error kinds exist: validation failures, which reject an
//! operation synchronously and leave state untouched, and persistence
//! failures, which callers log and swallow. Neither is ever fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous input rejection. The operation has no effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text was empty or whitespace-only
    #[error("Task text must not be empty")]
    EmptyTaskText,

    /// Unknown task id
    #[error("No task with id {0}")]
    UnknownTask(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Best-effort storage failure. Logged and swallowed; state unaffected.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read the snapshot or config file
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the snapshot, config, or report file
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File existed but did not parse
    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
