//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this course id already exists in the year partition.
    #[error("course already exists: {0}")]
    AlreadyExists(String),

    /// No record under this key.
    #[error("course not found: {0}")]
    NotFound(String),

    /// A persisted document carries a schema version this binary does not
    /// understand.
    #[error("unsupported record schema version {found} (supported up to {supported})")]
    Schema { found: u32, supported: u32 },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
