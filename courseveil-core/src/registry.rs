//! Course registry: creation and lookup of course records.
//!
//! The registry is the only component that writes the `course_id` and
//! `course_hash` fields; everything else treats them as read-only.

use std::sync::Arc;

use courseveil_crypto::sha256_hex;
use courseveil_store::{CourseStore, StoreError};
use courseveil_types::{CourseHash, CourseId, CourseRecord, Year};
use tracing::info;

use crate::{CoreError, CoreResult};

/// How a [`CourseRegistry::lookup_either`] call matched its token.
///
/// The course page behaves differently for respondents arriving through
/// the shareable hash link versus the raw course id.
#[derive(Debug, Clone)]
pub enum CourseMatch {
    /// The token was the derived course hash.
    ByHash(CourseRecord),
    /// The token was the raw course id.
    ById(CourseRecord),
}

impl CourseMatch {
    /// The matched record, however it was found.
    #[must_use]
    pub fn record(&self) -> &CourseRecord {
        match self {
            Self::ByHash(record) | Self::ById(record) => record,
        }
    }
}

/// Maps `(year, course id)` to course records.
pub struct CourseRegistry {
    store: Arc<dyn CourseStore>,
}

impl CourseRegistry {
    /// Creates a registry over the given store handle.
    #[must_use]
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Registers a course, deriving its stable shareable hash.
    ///
    /// The hash is a pure function of the course id, computed here exactly
    /// once and never recomputed afterwards.
    pub fn create_course(&self, year: Year, course_id: CourseId) -> CoreResult<CourseHash> {
        let hash = CourseHash::from_hex(sha256_hex(course_id.as_str().as_bytes()));
        let record = CourseRecord::new(year, course_id.clone(), hash.clone());

        match self.store.insert(record) {
            Ok(()) => {
                info!(%year, course = %course_id, hash = %hash, "course registered");
                Ok(hash)
            }
            Err(StoreError::AlreadyExists(id)) => Err(CoreError::AlreadyExists(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Looks up a record by its human-chosen id.
    pub fn find_by_id(&self, year: Year, course_id: &CourseId) -> CoreResult<CourseRecord> {
        self.store
            .get_by_id(year, course_id)?
            .ok_or_else(|| CoreError::NotFound(course_id.to_string()))
    }

    /// Looks up a record by its derived hash.
    pub fn find_by_hash(&self, year: Year, hash: &CourseHash) -> CoreResult<CourseRecord> {
        self.store
            .get_by_hash(year, hash)?
            .ok_or_else(|| CoreError::NotFound(hash.to_string()))
    }

    /// Accepts either the shareable hash or the raw course id, trying the
    /// hash first.
    pub fn lookup_either(&self, year: Year, token: &str) -> CoreResult<CourseMatch> {
        let as_hash = CourseHash::from_hex(token);
        if let Some(record) = self.store.get_by_hash(year, &as_hash)? {
            return Ok(CourseMatch::ByHash(record));
        }
        if let Ok(course_id) = CourseId::new(token) {
            if let Some(record) = self.store.get_by_id(year, &course_id)? {
                return Ok(CourseMatch::ById(record));
            }
        }
        Err(CoreError::NotFound(token.to_string()))
    }

    /// Diagnostic dump of every record, grouped by year.
    pub fn list_all(
        &self,
    ) -> CoreResult<std::collections::BTreeMap<Year, Vec<CourseRecord>>> {
        Ok(self.store.list_all()?)
    }
}
