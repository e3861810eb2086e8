//! Errors shared by repository capabilities.

use thiserror::Error;

/// Errors reported by repository capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record exists with the given id.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The backing store rejected or could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
