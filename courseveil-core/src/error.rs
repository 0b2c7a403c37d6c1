//! Service-level error taxonomy.

use courseveil_store::StoreError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the registry and issuance components.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Course creation collision. Reported to the caller, not retried.
    #[error("course already exists: {0}")]
    AlreadyExists(String),

    /// Course lookup miss. A user-facing "no such course", not fatal.
    #[error("no such course: {0}")]
    NotFound(String),

    /// Storage write error during key mint. The write is all-or-nothing,
    /// so no partial entry exists; the caller may retry.
    #[error("key issuance failed: {0}")]
    IssuanceFailed(String),

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
