//! Error types for access checks
//!
//! Denial is never an error: checks answer `Ok(false)`. Errors are reserved
//! for collaborator failures and for users the directory does not know.

use platform_entity::RepositoryError;
use thiserror::Error;

/// Access check error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The external user id could not be resolved to an entity
    #[error("Entity not found for user {user_id}")]
    EntityNotFound {
        /// External user id that was looked up
        user_id: String,
        /// The directory's lookup failure
        #[source]
        source: RepositoryError,
    },

    /// A collaborator lookup failed at the transport level
    #[error("Lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
}

/// Result type for access checks.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Unknown users are expected and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::Lookup(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::EntityNotFound { .. } => 404,
            AccessError::Lookup(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            AccessError::Lookup(_) => "LOOKUP_FAILED",
        }
    }
}
