//! Error types for Logsight client operations

use thiserror::Error;

/// Result type alias for Logsight client operations
pub type Result<T> = std::result::Result<T, LogsightClientError>;

/// Errors that can occur during Logsight client operations
#[derive(Error, Debug)]
pub enum LogsightClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Server rejected the request as malformed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upload exceeded the server's size limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl LogsightClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }
}
