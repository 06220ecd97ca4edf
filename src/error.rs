//! Error types for noisefix library.

use std::io;
use thiserror::Error;

/// Result type alias for noisefix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for noisefix library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading or writing error (missing columns, bad values).
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON Lines reading or writing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// The dataset file format is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Detector or converter options are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport error talking to the model backend.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The model backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// The model backend answered without a usable completion.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// A blocking conversion task failed to complete.
    #[error("Task join error: {0}")]
    Join(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
