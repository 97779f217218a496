//! Error types for entity lookups
//!
//! A lookup that finds nothing is not an error for entity lookups (they return
//! `Ok(None)`); only user resolution reports a miss as [`RepositoryError::NotFound`].
//! Everything else is a transport failure that callers propagate.

use thiserror::Error;

/// Repository error types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached or answered with garbage
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Check if this error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RepositoryError::NotFound(_) => "NOT_FOUND",
            RepositoryError::Transport(_) => "TRANSPORT_ERROR",
        }
    }
}
