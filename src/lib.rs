//! UI Harness Report - outcome collection and reporting for browser UI tests.
//!
//! This crate provides:
//! - An explicit report session owning the run's outcome records
//! - Failure screenshots that never fail the run themselves
//! - Per-test JSON records written as soon as each test finishes
//! - An aggregate HTML report and a zip archive of the report directory
//! - The browser page contract, an in-memory mock page and ordered locator fallbacks
//!
//! # Example
//!
//! ```rust,no_run
//! use ui_harness_report::browser::MockPage;
//! use ui_harness_report::report::{Outcome, TestOutcomeRecord};
//! use ui_harness_report::session::ReportSession;
//!
//! let mut session = ReportSession::in_dir("reports");
//! session.init().unwrap();
//!
//! let page = MockPage::new("https://example.test/login");
//! session.record_outcome(TestOutcomeRecord::failed("tests/test_login.py::test_a", "element not found", 1.2));
//! session.finish_test("tests/test_login.py::test_a", Some(&page), Outcome::Errored);
//!
//! let artifacts = session.finish(1).unwrap();
//! println!("{}", artifacts.report.display());
//! ```

pub mod browser;
pub mod config;
pub mod envfile;
pub mod harness;
pub mod logging;
pub mod report;
pub mod runner;
pub mod session;

// Re-export runner types
pub use runner::{EXIT_OK, EXIT_TESTS_FAILED, RunSummary};

// Re-export harness types
pub use harness::{CaseError, CaseResult, TestCase, run_suite};

// Re-export browser contract
pub use browser::{Fallback, LoadState, MockPage, Page, PageError, PageResult, WaitState};

// Re-export report pipeline
pub use report::{
    ArchiveSummary, FailureCapture, Outcome, RenderContext, ReportError, ReportResult, ResultStore,
    TestOutcomeRecord, archive_report_dir, capture_failure, record_test, render_report, write_report,
};

// Re-export session management
pub use session::{ReportSession, SessionArtifacts};
