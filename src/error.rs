//! Error types for the mailru_share crate.

use thiserror::Error;

/// Errors that can occur while resolving, listing or downloading a public share.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Wrong link: {0}")]
    InvalidLink(String),

    #[error("Page id not found on share page: {0}")]
    TokenNotFound(String),

    #[error("Missing key in response: {0}")]
    MissingKey(String),

    #[error("Unexpected type in response: {0}")]
    UnexpectedType(String),

    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Zero file size reported for {0}")]
    ZeroSize(String),

    #[error("Refusing unsafe file or folder name: {0:?}")]
    UnsafeName(String),

    #[error("Folder nesting deeper than {0} levels")]
    DepthExceeded(usize),
}

/// Result type alias for ShareError.
pub type Result<T> = std::result::Result<T, ShareError>;
