use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::report::types::{ReportResult, TestOutcomeRecord};

/// In-memory, insertion-ordered collection of the run's outcome records.
///
/// The harness runs tests one after another on a single thread, so the store
/// is owned by the session and mutated through `&mut`.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Vec<TestOutcomeRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end of the run's sequence
    pub fn append(&mut self, record: TestOutcomeRecord) {
        debug!(test_id = %record.test_id, outcome = %record.outcome(), "recorded outcome");
        self.records.push(record);
    }

    /// All records in insertion order
    pub fn all(&self) -> &[TestOutcomeRecord] {
        &self.records
    }

    pub fn find(&self, test_id: &str) -> Option<&TestOutcomeRecord> {
        self.records.iter().find(|r| r.test_id == test_id)
    }

    pub fn find_mut(&mut self, test_id: &str) -> Option<&mut TestOutcomeRecord> {
        self.records.iter_mut().find(|r| r.test_id == test_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuild a store from the per-test JSON files in a report directory.
    ///
    /// Files that are not outcome records are skipped. Records are ordered by
    /// start time, which matches the order the tests ran in.
    pub fn load_dir(dir: &Path) -> ReportResult<Self> {
        let mut records = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    serde_json::from_str::<TestOutcomeRecord>(&text).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(record) => records.push(record.normalized()),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable test record"),
            }
        }
        records.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.test_id.cmp(&b.test_id))
        });
        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_append_preserves_order() {
        let mut store = ResultStore::new();
        store.append(TestOutcomeRecord::passed("b", 1.0));
        store.append(TestOutcomeRecord::failed("a", "boom", 1.0));
        store.append(TestOutcomeRecord::skipped("c", 0.0));

        let ids: Vec<&str> = store.all().iter().map(|r| r.test_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_find_mut_updates_in_place() {
        let mut store = ResultStore::new();
        store.append(TestOutcomeRecord::failed("a::b", "boom", 1.0));
        store
            .find_mut("a::b")
            .unwrap()
            .attach_capture("https://example.test", None);
        assert_eq!(
            store.find("a::b").unwrap().page_url.as_deref(),
            Some("https://example.test")
        );
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn test_load_dir_orders_by_start_and_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let later = TestOutcomeRecord::passed("t::later", 1.0).started_at(now);
        let earlier = TestOutcomeRecord::failed("t::earlier", "boom", 1.0)
            .started_at(now - Duration::seconds(10));

        fs::write(dir.path().join("later.json"), serde_json::to_string(&later).unwrap()).unwrap();
        fs::write(dir.path().join("earlier.json"), serde_json::to_string(&earlier).unwrap()).unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "not a record"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = ResultStore::load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = store.all().iter().map(|r| r.test_id.as_str()).collect();
        assert_eq!(ids, vec!["t::earlier", "t::later"]);
    }
}
