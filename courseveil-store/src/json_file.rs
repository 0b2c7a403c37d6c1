//! Whole-database JSON document file backend.
//!
//! The database is one JSON document mapping year partitions to their
//! course records, loaded fully at open and rewritten after every
//! mutation with a write-temp-then-rename replace, so a crash never
//! leaves a half-written database or a partially-written key entry.
//! Suitable for the single-instance deployments this service runs as.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use courseveil_types::{CourseHash, CourseId, CourseRecord, Year, SCHEMA_VERSION};
use tracing::info;

use crate::{CasOutcome, CourseStore, Revision, StoreError, StoreResult};

type SlotKey = (Year, String);

#[derive(Debug, Clone)]
struct Slot {
    revision: Revision,
    record: CourseRecord,
}

/// Serialized document shape: year partition -> records, like the original
/// one-file document store this service grew out of.
type Document = BTreeMap<String, Vec<CourseRecord>>;

/// JSON-file-backed course store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: Mutex<HashMap<SlotKey, Slot>>,
}

impl JsonFileStore {
    /// Opens a store at `path`, loading and validating any existing
    /// database document. A missing file starts an empty store; a document
    /// that does not match the record schema is rejected.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut slots = HashMap::new();

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let document: Document = serde_json::from_str(&raw)?;
            for records in document.into_values() {
                for record in records {
                    if record.schema_version > SCHEMA_VERSION {
                        return Err(StoreError::Schema {
                            found: record.schema_version,
                            supported: SCHEMA_VERSION,
                        });
                    }
                    let key = (record.year, record.course_id.as_str().to_string());
                    slots.insert(key, Slot { revision: 0, record });
                }
            }
            info!(path = %path.display(), courses = slots.len(), "loaded course database");
        }

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// Rewrites the database document from the given state. Callers hold
    /// the slot lock, so the document always reflects one committed state.
    fn flush(path: &Path, slots: &HashMap<SlotKey, Slot>) -> StoreResult<()> {
        let mut document = Document::new();
        for slot in slots.values() {
            document
                .entry(slot.record.year.to_string())
                .or_default()
                .push(slot.record.clone());
        }
        for records in document.values_mut() {
            records.sort_by(|a, b| a.course_id.as_str().cmp(b.course_id.as_str()));
        }

        let json = serde_json::to_string_pretty(&document)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl CourseStore for JsonFileStore {
    fn insert(&self, record: CourseRecord) -> StoreResult<()> {
        let mut slots = self.slots.lock().unwrap();
        let key = (record.year, record.course_id.as_str().to_string());
        if slots.contains_key(&key) {
            return Err(StoreError::AlreadyExists(record.course_id.to_string()));
        }
        info!(year = %record.year, course = %record.course_id, "storing new course record");
        slots.insert(key.clone(), Slot { revision: 0, record });

        if let Err(err) = Self::flush(&self.path, &slots) {
            slots.remove(&key);
            return Err(err);
        }
        Ok(())
    }

    fn get_by_id(&self, year: Year, course_id: &CourseId) -> StoreResult<Option<CourseRecord>> {
        let slots = self.slots.lock().unwrap();
        Ok(slots
            .get(&(year, course_id.as_str().to_string()))
            .map(|slot| slot.record.clone()))
    }

    fn get_by_hash(&self, year: Year, hash: &CourseHash) -> StoreResult<Option<CourseRecord>> {
        Ok(self.get_versioned_by_hash(year, hash)?.map(|(_, record)| record))
    }

    fn get_versioned_by_hash(
        &self,
        year: Year,
        hash: &CourseHash,
    ) -> StoreResult<Option<(Revision, CourseRecord)>> {
        let slots = self.slots.lock().unwrap();
        Ok(slots
            .values()
            .find(|slot| slot.record.year == year && slot.record.course_hash == *hash)
            .map(|slot| (slot.revision, slot.record.clone())))
    }

    fn compare_and_swap(&self, expected: Revision, record: CourseRecord) -> StoreResult<CasOutcome> {
        let mut slots = self.slots.lock().unwrap();
        let key = (record.year, record.course_id.as_str().to_string());
        let Some(slot) = slots.get_mut(&key) else {
            return Err(StoreError::NotFound(record.course_id.to_string()));
        };
        if slot.revision != expected {
            return Ok(CasOutcome::Conflict);
        }

        let previous = slot.clone();
        slot.revision += 1;
        slot.record = record;

        if let Err(err) = Self::flush(&self.path, &slots) {
            // The write did not land; the entry must not survive half-done.
            slots.insert(key, previous);
            return Err(err);
        }
        Ok(CasOutcome::Committed)
    }

    fn list_all(&self) -> StoreResult<BTreeMap<Year, Vec<CourseRecord>>> {
        let slots = self.slots.lock().unwrap();
        let mut out: BTreeMap<Year, Vec<CourseRecord>> = BTreeMap::new();
        for slot in slots.values() {
            out.entry(slot.record.year).or_default().push(slot.record.clone());
        }
        for records in out.values_mut() {
            records.sort_by(|a, b| a.course_id.as_str().cmp(b.course_id.as_str()));
        }
        Ok(out)
    }
}
