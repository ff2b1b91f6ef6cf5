// Core types for the reporting pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detail attached to a failure whose diagnostic text came back empty
pub const DEFAULT_FAILURE_DETAIL: &str = "test failed";

/// Outcome of a single executed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Errored,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
            Outcome::Errored => "errored",
        }
    }

    /// CSS class used for the primary report row (skipped rows stay neutral)
    pub fn row_class(&self) -> &'static str {
        match self {
            Outcome::Passed => "pass",
            Outcome::Failed => "fail",
            Outcome::Errored => "error",
            Outcome::Skipped => "",
        }
    }

    /// Whether this outcome makes the run exit non-zero
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Errored)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of one test, including diagnostic attachments.
///
/// `outcome` and `failure_detail` are only set together through the
/// constructors, so a record carries a non-empty detail exactly when it
/// failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcomeRecord {
    /// Hierarchical test identifier (`path::Class::test`)
    pub test_id: String,

    outcome: Outcome,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_detail: Option<String>,

    /// Wall-clock duration of the test body
    pub duration_seconds: f64,

    /// When the test body started
    pub started_at: DateTime<Utc>,

    /// URL of the page at failure time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,

    /// Screenshot path relative to the report directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
}

impl TestOutcomeRecord {
    fn new(test_id: impl Into<String>, outcome: Outcome, detail: Option<String>, duration: f64) -> Self {
        Self {
            test_id: test_id.into(),
            outcome,
            failure_detail: detail,
            duration_seconds: clamp_duration(duration),
            started_at: Utc::now(),
            page_url: None,
            screenshot_path: None,
        }
    }

    pub fn passed(test_id: impl Into<String>, duration: f64) -> Self {
        Self::new(test_id, Outcome::Passed, None, duration)
    }

    pub fn failed(test_id: impl Into<String>, detail: impl Into<String>, duration: f64) -> Self {
        let detail = detail.into();
        let detail = if detail.trim().is_empty() {
            DEFAULT_FAILURE_DETAIL.to_string()
        } else {
            detail
        };
        Self::new(test_id, Outcome::Failed, Some(detail), duration)
    }

    pub fn skipped(test_id: impl Into<String>, duration: f64) -> Self {
        Self::new(test_id, Outcome::Skipped, None, duration)
    }

    pub fn errored(test_id: impl Into<String>, duration: f64) -> Self {
        Self::new(test_id, Outcome::Errored, None, duration)
    }

    /// Set the start time (defaults to construction time)
    pub fn started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn failure_detail(&self) -> Option<&str> {
        self.failure_detail.as_deref()
    }

    /// Attach failure-time page URL and screenshot. Empty values are stored as absent.
    pub fn attach_capture(&mut self, page_url: &str, screenshot_path: Option<&str>) {
        self.page_url = non_empty(page_url);
        self.screenshot_path = screenshot_path.and_then(non_empty);
    }

    /// Restore the record invariants after deserializing a file written elsewhere.
    pub fn normalized(mut self) -> Self {
        match self.outcome {
            Outcome::Failed => {
                if self.failure_detail.as_deref().map_or(true, |d| d.trim().is_empty()) {
                    self.failure_detail = Some(DEFAULT_FAILURE_DETAIL.to_string());
                }
            }
            _ => self.failure_detail = None,
        }
        self.duration_seconds = clamp_duration(self.duration_seconds);
        self.page_url = self.page_url.as_deref().and_then(non_empty);
        self.screenshot_path = self.screenshot_path.as_deref().and_then(non_empty);
        self
    }
}

fn clamp_duration(duration: f64) -> f64 {
    // f64::max drops NaN in favour of 0.0
    duration.max(0.0)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error types for report rendering and archiving
#[derive(Debug)]
pub enum ReportError {
    /// I/O error
    Io(std::io::Error),

    /// Serialization error
    Serialization(serde_json::Error),

    /// Error writing the zip archive
    Archive(zip::result::ZipError),

    /// Error walking the report directory
    Walk(walkdir::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "I/O error: {}", err),
            ReportError::Serialization(err) => write!(f, "Serialization error: {}", err),
            ReportError::Archive(err) => write!(f, "Archive error: {}", err),
            ReportError::Walk(err) => write!(f, "Directory walk error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Serialization(err) => Some(err),
            ReportError::Archive(err) => Some(err),
            ReportError::Walk(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err)
    }
}

impl From<zip::result::ZipError> for ReportError {
    fn from(err: zip::result::ZipError) -> Self {
        ReportError::Archive(err)
    }
}

impl From<walkdir::Error> for ReportError {
    fn from(err: walkdir::Error) -> Self {
        ReportError::Walk(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_detail_only_on_failed() {
        assert!(TestOutcomeRecord::passed("a", 1.0).failure_detail().is_none());
        assert!(TestOutcomeRecord::skipped("a", 0.0).failure_detail().is_none());
        assert!(TestOutcomeRecord::errored("a", 0.0).failure_detail().is_none());
        let failed = TestOutcomeRecord::failed("a", "element not found", 1.0);
        assert_eq!(failed.failure_detail(), Some("element not found"));
    }

    #[test]
    fn test_failed_with_empty_detail_gets_default() {
        let failed = TestOutcomeRecord::failed("a", "  ", 1.0);
        assert_eq!(failed.failure_detail(), Some(DEFAULT_FAILURE_DETAIL));
    }

    #[test]
    fn test_negative_and_nan_durations_clamp_to_zero() {
        assert_eq!(TestOutcomeRecord::passed("a", -3.0).duration_seconds, 0.0);
        assert_eq!(TestOutcomeRecord::passed("a", f64::NAN).duration_seconds, 0.0);
    }

    #[test]
    fn test_attach_capture_treats_empty_as_absent() {
        let mut record = TestOutcomeRecord::failed("a", "boom", 1.0);
        record.attach_capture("", Some(""));
        assert!(record.page_url.is_none());
        assert!(record.screenshot_path.is_none());

        record.attach_capture("https://example.test/x", Some("a-20240101-000000.png"));
        assert_eq!(record.page_url.as_deref(), Some("https://example.test/x"));
        assert_eq!(record.screenshot_path.as_deref(), Some("a-20240101-000000.png"));
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        let json = serde_json::to_value(TestOutcomeRecord::skipped("a", 0.5)).unwrap();
        assert_eq!(json["outcome"], "skipped");
        assert!(json.get("failure_detail").is_none());
    }

    #[test]
    fn test_normalized_repairs_foreign_records() {
        let json = r#"{"test_id":"t","outcome":"passed","failure_detail":"stale",
            "duration_seconds":-1.0,"started_at":"2024-01-01T00:00:00Z","page_url":""}"#;
        let record: TestOutcomeRecord = serde_json::from_str(json).unwrap();
        let record = record.normalized();
        assert!(record.failure_detail().is_none());
        assert_eq!(record.duration_seconds, 0.0);
        assert!(record.page_url.is_none());

        let json = r#"{"test_id":"t","outcome":"failed","duration_seconds":1.0,
            "started_at":"2024-01-01T00:00:00Z"}"#;
        let record: TestOutcomeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.normalized().failure_detail(), Some(DEFAULT_FAILURE_DETAIL));
    }
}
