//! Types for test run results.

use serde::{Deserialize, Serialize};

use crate::report::{Outcome, TestOutcomeRecord};

/// Exit status when every test passed or was skipped
pub const EXIT_OK: i32 = 0;

/// Exit status when at least one test failed or errored
pub const EXIT_TESTS_FAILED: i32 = 1;

/// Aggregate counts for a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,

    /// Process exit status; derived from test outcomes only
    pub exit_status: i32,
}

impl RunSummary {
    pub fn from_records(records: &[TestOutcomeRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            match record.outcome() {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed => summary.failed += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Errored => summary.errored += 1,
            }
        }
        summary.exit_status = if summary.failed + summary.errored > 0 {
            EXIT_TESTS_FAILED
        } else {
            EXIT_OK
        };
        summary
    }

    pub fn success(&self) -> bool {
        self.exit_status == EXIT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_do_not_fail_the_run() {
        let summary = RunSummary::from_records(&[
            TestOutcomeRecord::passed("a", 1.0),
            TestOutcomeRecord::skipped("b", 0.0),
        ]);
        assert_eq!(summary.total, 2);
        assert!(summary.success());
    }

    #[test]
    fn test_failures_and_errors_set_exit_status() {
        let failed = RunSummary::from_records(&[TestOutcomeRecord::failed("a", "x", 1.0)]);
        assert_eq!(failed.exit_status, EXIT_TESTS_FAILED);

        let errored = RunSummary::from_records(&[TestOutcomeRecord::errored("a", 0.0)]);
        assert_eq!(errored.exit_status, EXIT_TESTS_FAILED);
        assert_eq!(errored.errored, 1);
    }

    #[test]
    fn test_empty_run_is_ok() {
        assert_eq!(RunSummary::from_records(&[]), RunSummary::default());
    }
}
