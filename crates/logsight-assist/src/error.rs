//! Error types for collaborator calls

use thiserror::Error;

/// Result type alias for collaborator calls
pub type AssistResult<T> = std::result::Result<T, AssistError>;

/// Errors from talking to the external collaborator.
///
/// Callers in the request path absorb these and fall back to an empty or
/// partial payload; they are never surfaced as an HTTP error status.
#[derive(Error, Debug)]
pub enum AssistError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Service answered with a non-success status
    #[error("Collaborator returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Service answered but carried no text candidate
    #[error("Collaborator response had no text")]
    EmptyResponse,

    /// Provider needs a key that is not configured
    #[error("No API key configured (checked {0})")]
    MissingApiKey(String),

    /// Provider name not recognized
    #[error("Unknown assistant provider: {0}")]
    UnknownProvider(String),
}
