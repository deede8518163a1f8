//! Core error types for fixate-core.
//!
//! Malformed or missing durable data is never an error: the completion
//! tracker recovers to an empty set locally. Errors here cover the two
//! cases that do reach callers: a failed write-through and an out-of-range
//! duration request.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fixate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Persistence-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the record file failed
    #[error("Failed to access store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored record could not be parsed
    #[error("Malformed store record at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be serialized for writing
    #[error("Failed to encode store record: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backend refused the write (in-memory test stores)
    #[error("Store rejected write: {0}")]
    Rejected(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Requested session duration outside the selectable range
    #[error("Duration {minutes} min outside selectable range {min}..={max}")]
    DurationOutOfRange { minutes: u32, min: u32, max: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
