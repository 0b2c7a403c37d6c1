//! In-memory storage backend.
//!
//! Default backend for tests and development. Data is lost on restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use courseveil_types::{CourseHash, CourseId, CourseRecord, Year};
use tracing::info;

use crate::{CasOutcome, CourseStore, Revision, StoreError, StoreResult};

type SlotKey = (Year, String);

#[derive(Debug, Clone)]
struct Slot {
    revision: Revision,
    record: CourseRecord,
}

/// In-memory course store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<SlotKey, Slot>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn slot_key(record: &CourseRecord) -> SlotKey {
    (record.year, record.course_id.as_str().to_string())
}

impl CourseStore for MemoryStore {
    fn insert(&self, record: CourseRecord) -> StoreResult<()> {
        let mut slots = self.slots.write().unwrap();
        let key = slot_key(&record);
        if slots.contains_key(&key) {
            return Err(StoreError::AlreadyExists(record.course_id.to_string()));
        }
        info!(year = %record.year, course = %record.course_id, "storing new course record");
        slots.insert(key, Slot { revision: 0, record });
        Ok(())
    }

    fn get_by_id(&self, year: Year, course_id: &CourseId) -> StoreResult<Option<CourseRecord>> {
        let slots = self.slots.read().unwrap();
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
        let slots = self.slots.read().unwrap();
        Ok(slots
            .values()
            .find(|slot| slot.record.year == year && slot.record.course_hash == *hash)
            .map(|slot| (slot.revision, slot.record.clone())))
    }

    fn compare_and_swap(&self, expected: Revision, record: CourseRecord) -> StoreResult<CasOutcome> {
        let mut slots = self.slots.write().unwrap();
        let key = slot_key(&record);
        let Some(slot) = slots.get_mut(&key) else {
            return Err(StoreError::NotFound(record.course_id.to_string()));
        };
        if slot.revision != expected {
            return Ok(CasOutcome::Conflict);
        }
        slot.revision += 1;
        slot.record = record;
        Ok(CasOutcome::Committed)
    }

    fn list_all(&self) -> StoreResult<BTreeMap<Year, Vec<CourseRecord>>> {
        let slots = self.slots.read().unwrap();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: u16, id: &str) -> CourseRecord {
        CourseRecord::new(
            Year::new(year).unwrap(),
            CourseId::new(id).unwrap(),
            CourseHash::from_hex(format!("hash-{id}")),
        )
    }

    #[test]
    fn insert_then_get_by_id() {
        let store = MemoryStore::new();
        store.insert(record(2024, "CS101")).unwrap();

        let found = store
            .get_by_id(Year::new(2024).unwrap(), &CourseId::new("CS101").unwrap())
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn double_insert_is_already_exists() {
        let store = MemoryStore::new();
        store.insert(record(2024, "CS101")).unwrap();
        let err = store.insert(record(2024, "CS101")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn same_id_different_year_is_fine() {
        let store = MemoryStore::new();
        store.insert(record(2023, "CS101")).unwrap();
        store.insert(record(2024, "CS101")).unwrap();

        assert!(store
            .get_by_id(Year::new(2023).unwrap(), &CourseId::new("CS101").unwrap())
            .unwrap()
            .is_some());
    }

    #[test]
    fn cas_commits_at_expected_revision() {
        let store = MemoryStore::new();
        store.insert(record(2024, "CS101")).unwrap();

        let (rev, rec) = store
            .get_versioned_by_hash(Year::new(2024).unwrap(), &CourseHash::from_hex("hash-CS101"))
            .unwrap()
            .unwrap();
        assert_eq!(rev, 0);
        assert_eq!(store.compare_and_swap(rev, rec).unwrap(), CasOutcome::Committed);
    }

    #[test]
    fn cas_conflicts_on_stale_revision() {
        let store = MemoryStore::new();
        store.insert(record(2024, "CS101")).unwrap();

        let (rev, rec) = store
            .get_versioned_by_hash(Year::new(2024).unwrap(), &CourseHash::from_hex("hash-CS101"))
            .unwrap()
            .unwrap();
        store.compare_and_swap(rev, rec.clone()).unwrap();
        assert_eq!(store.compare_and_swap(rev, rec).unwrap(), CasOutcome::Conflict);
    }

    #[test]
    fn cas_on_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store.compare_and_swap(0, record(2024, "GHOST")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn list_all_groups_by_year() {
        let store = MemoryStore::new();
        store.insert(record(2023, "CS101")).unwrap();
        store.insert(record(2024, "CS101")).unwrap();
        store.insert(record(2024, "AI200")).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&Year::new(2024).unwrap()].len(), 2);
        // Sorted by course id within a year.
        assert_eq!(all[&Year::new(2024).unwrap()][0].course_id.as_str(), "AI200");
    }
}
