//! Error types for decoding, encoding and bundle loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the status codec and bundle loader.
#[derive(Error, Debug)]
pub enum StatusError {
    /// The document is valid JSON but does not match the status shape
    /// (bad status code, unknown level, wrong field type).
    #[error("format error: {0}")]
    Format(String),
    /// Syntactically invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A bundle file could not be read or is not a flat string table.
    #[error("bundle {}: {reason}", path.display())]
    Bundle { path: PathBuf, reason: String },
}

impl StatusError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        StatusError::Format(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StatusError>;
