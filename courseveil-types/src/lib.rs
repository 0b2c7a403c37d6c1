//! Core type definitions for courseveil.
//!
//! This crate defines the fundamental types shared by every component:
//! - Identifier newtypes (year partition, course id, course hash, session token)
//! - The persisted course record and its issued-key entries
//!
//! Anything HTTP- or storage-specific belongs in the respective crates,
//! not here.

mod ids;
mod record;

pub use ids::{CourseHash, CourseId, SessionToken, Year};
pub use record::{CourseRecord, IssuedKey, SignatureAlgorithm, SCHEMA_VERSION};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("year must have four digits, got {0}")]
    InvalidYear(u16),

    #[error("not a year: {0}")]
    UnparsableYear(String),

    #[error("course id must not be empty")]
    EmptyCourseId,

    #[error("invalid session token: {0}")]
    InvalidSessionToken(#[from] uuid::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
