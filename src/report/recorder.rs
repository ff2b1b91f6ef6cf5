//! Per-test record files.
//!
//! Each finished test is written to `{test_name}.json` straight away, so the
//! record survives a harness crash before the aggregate report exists.
//! Writing is best effort and never changes the test's outcome.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::report::types::{ReportResult, TestOutcomeRecord};

/// Last `::` segment of a hierarchical test id
pub fn test_name(test_id: &str) -> &str {
    test_id.rsplit("::").next().unwrap_or(test_id)
}

/// File name of the per-test record, safe to join onto the report directory
pub fn record_file_name(test_id: &str) -> String {
    format!("{}.json", test_name(test_id).replace(['/', '\\'], "_"))
}

/// Serialize one record into the report directory
pub fn write_record_file(report_dir: &Path, record: &TestOutcomeRecord) -> ReportResult<PathBuf> {
    let path = report_dir.join(record_file_name(&record.test_id));
    fs::write(&path, serde_json::to_string_pretty(record)?)?;
    Ok(path)
}

/// Best-effort variant of [`write_record_file`]: failures are logged and
/// reported as `None`.
pub fn record_test(report_dir: &Path, record: &TestOutcomeRecord) -> Option<PathBuf> {
    match write_record_file(report_dir, record) {
        Ok(path) => {
            debug!(test_id = %record.test_id, path = %path.display(), "wrote per-test record");
            Some(path)
        }
        Err(e) => {
            warn!(test_id = %record.test_id, error = %e, "could not write per-test record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_test_name_takes_last_segment() {
        assert_eq!(test_name("tests/test_login.py::TestLoginFlow::test_type_email"), "test_type_email");
        assert_eq!(test_name("plain"), "plain");
    }

    #[test]
    fn test_record_file_name_strips_separators() {
        assert_eq!(record_file_name("t.py::test_param[a/b]"), "test_param[a_b].json");
    }

    #[test]
    fn test_record_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = TestOutcomeRecord::failed("t.py::T::test_b", "element not found", 0.42);
        record.attach_capture("https://example.test", Some("t.py_T_test_b-20240101-000000.png"));

        let path = record_test(dir.path(), &record).unwrap();
        assert_eq!(path, dir.path().join("test_b.json"));

        let text = fs::read_to_string(&path).unwrap();
        let back: TestOutcomeRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let record = TestOutcomeRecord::passed("t::a", 1.0);
        assert!(record_test(&missing, &record).is_none());
        assert!(write_record_file(&missing, &record).is_err());
    }
}
