//! Error types for the ingestion core

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the ingestion core.
///
/// Only genuine I/O failure is an error; malformed lines and missing tokens
/// are absorbed where they occur.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input could not be opened or read at all
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
