//! Storage layer for courseveil.
//!
//! A minimal key-value contract over course records, partitioned by year.
//! Two backends: an in-memory store for tests and development, and a
//! whole-database JSON document file for single-instance deployments.
//!
//! The one cross-request guarantee the contract makes is the
//! compare-and-swap primitive: issuance serializes on it so two concurrent
//! first visits from the same session can never both mint a key. Every
//! record mutation is an atomic replace-whole-record operation.

mod error;
mod json_file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use courseveil_types::{CourseHash, CourseId, CourseRecord, Year};

/// Opaque per-record revision counter, bumped on every committed write.
pub type Revision = u64;

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The record was unchanged since the tagged read; the write landed.
    Committed,
    /// Someone else committed first; re-read and retry.
    Conflict,
}

/// Storage contract for course records.
///
/// Implementations must be thread-safe; handlers share one store behind an
/// `Arc`.
pub trait CourseStore: Send + Sync {
    /// Inserts a fresh record. Fails with [`StoreError::AlreadyExists`] if
    /// the `(year, course_id)` slot is occupied. All-or-nothing.
    fn insert(&self, record: CourseRecord) -> StoreResult<()>;

    /// Looks a record up by its human-chosen id.
    fn get_by_id(&self, year: Year, course_id: &CourseId) -> StoreResult<Option<CourseRecord>>;

    /// Looks a record up by its derived hash.
    fn get_by_hash(&self, year: Year, hash: &CourseHash) -> StoreResult<Option<CourseRecord>>;

    /// Hash lookup returning the revision tag needed for a later
    /// [`CourseStore::compare_and_swap`].
    fn get_versioned_by_hash(
        &self,
        year: Year,
        hash: &CourseHash,
    ) -> StoreResult<Option<(Revision, CourseRecord)>>;

    /// Replaces the whole record if and only if it is still at `expected`.
    /// The record's own `year`/`course_id` identify the slot. Fails with
    /// [`StoreError::NotFound`] if the slot is empty.
    fn compare_and_swap(&self, expected: Revision, record: CourseRecord) -> StoreResult<CasOutcome>;

    /// Diagnostic dump of every record, grouped by year partition.
    fn list_all(&self) -> StoreResult<BTreeMap<Year, Vec<CourseRecord>>>;
}
