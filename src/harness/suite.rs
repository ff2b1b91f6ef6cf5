use chrono::Utc;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{info, warn};

use crate::browser::{Page, PageResult};
use crate::harness::types::{CaseError, TestCase};
use crate::report::{Outcome, TestOutcomeRecord};
use crate::runner::RunSummary;
use crate::session::ReportSession;

/// Runs test cases one after another, each against a fresh page from
/// `open_page`, and drives the session hooks around every case.
///
/// After the last case the HTML report and archive are written. A failure
/// there is logged but never changes the returned exit status, which
/// reflects test outcomes only.
pub fn run_suite<F>(session: &mut ReportSession, cases: Vec<TestCase>, mut open_page: F) -> RunSummary
where
    F: FnMut(&str) -> PageResult<Box<dyn Page>>,
{
    if let Err(e) = session.init() {
        warn!(dir = %session.dir.display(), error = %e, "could not create report directory");
    }

    for case in cases {
        run_case(session, case, &mut open_page);
    }

    let summary = session.summary();
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        errored = summary.errored,
        "suite finished"
    );
    if let Err(e) = session.finish(summary.exit_status) {
        warn!(error = %e, "could not write aggregate report");
    }
    summary
}

fn run_case<F>(session: &mut ReportSession, mut case: TestCase, open_page: &mut F)
where
    F: FnMut(&str) -> PageResult<Box<dyn Page>>,
{
    let mut page = match open_page(&case.id) {
        Ok(page) => page,
        Err(e) => {
            warn!(test_id = %case.id, error = %e, "page setup failed");
            session.finish_test(&case.id, None, Outcome::Errored);
            return;
        }
    };

    let started_at = Utc::now();
    let start = Instant::now();
    let result = match panic::catch_unwind(AssertUnwindSafe(|| (case.body)(page.as_mut()))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!(test_id = %case.id, panic = %msg, "test body panicked");
            Err(CaseError::failed(format!("panicked: {}", msg)))
        }
    };
    let duration = start.elapsed().as_secs_f64();

    let record = match result {
        Ok(()) => TestOutcomeRecord::passed(&case.id, duration),
        Err(CaseError::Failed(detail)) => TestOutcomeRecord::failed(&case.id, detail, duration),
        Err(CaseError::Skipped(reason)) => {
            info!(test_id = %case.id, reason = %reason, "test skipped");
            TestOutcomeRecord::skipped(&case.id, duration)
        }
    };
    info!(test_id = %case.id, outcome = %record.outcome(), duration, "test finished");
    session.record_outcome(record.started_at(started_at));
    session.finish_test(&case.id, Some(page.as_ref()), Outcome::Errored);
    page.close();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MockPage, PageError, WaitState};
    use crate::harness::types::ensure;
    use crate::runner::EXIT_TESTS_FAILED;
    use std::time::Duration;

    const T: Duration = Duration::from_millis(50);

    fn mock(_: &str) -> PageResult<Box<dyn Page>> {
        Ok(Box::new(MockPage::new("https://example.test/login").with_element("h1")))
    }

    #[test]
    fn test_every_case_yields_exactly_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ReportSession::in_dir(dir.path());
        let cases = vec![
            TestCase::new("t.py::A::test_pass", |page: &mut dyn Page| {
                page.wait_for("h1", WaitState::Visible, T)?;
                Ok(())
            }),
            TestCase::new("t.py::A::test_fail", |page: &mut dyn Page| {
                page.click("#missing", T)?;
                Ok(())
            }),
            TestCase::new("t.py::A::test_skip", |_: &mut dyn Page| Err(CaseError::skipped("no credentials"))),
        ];

        let summary = run_suite(&mut session, cases, mock);

        assert_eq!(summary.total, 3);
        assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
        assert_eq!(summary.exit_status, EXIT_TESTS_FAILED);

        let records = session.store().all();
        let ids: Vec<&str> = records.iter().map(|r| r.test_id.as_str()).collect();
        assert_eq!(ids, vec!["t.py::A::test_pass", "t.py::A::test_fail", "t.py::A::test_skip"]);
        for record in records {
            assert_eq!(record.failure_detail().is_some(), record.outcome() == Outcome::Failed);
        }
        assert!(records[1].failure_detail().unwrap().contains("#missing"));
        assert!(records[1].screenshot_path.is_some());
        assert!(dir.path().join("report.html").is_file());
        assert!(dir.path().join("report.zip").is_file());
    }

    #[test]
    fn test_setup_error_is_recorded_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ReportSession::in_dir(dir.path());
        let cases = vec![
            TestCase::new("t::broken", |_: &mut dyn Page| Ok(())),
            TestCase::new("t::fine", |page: &mut dyn Page| {
                ensure(page.current_url()?.contains("login"), "expected login page")
            }),
        ];
        let mut opened = 0;
        let summary = run_suite(&mut session, cases, |id| {
            opened += 1;
            if id == "t::broken" {
                Err(PageError::Other("browser crashed".to_string()))
            } else {
                mock(id)
            }
        });

        assert_eq!(opened, 2);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.passed, 1);
        assert!(dir.path().join("broken.json").is_file());
        assert!(dir.path().join("fine.json").is_file());
    }

    #[test]
    fn test_page_closed_inside_body_keeps_failure_without_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ReportSession::in_dir(dir.path());
        let cases = vec![TestCase::new("t::closes", |page: &mut dyn Page| {
            page.close();
            Err(CaseError::failed("element not found"))
        })];

        let summary = run_suite(&mut session, cases, mock);

        assert_eq!(summary.failed, 1);
        let record = &session.store().all()[0];
        assert_eq!(record.failure_detail(), Some("element not found"));
        assert!(record.screenshot_path.is_none());
        assert!(session.list_captures().unwrap().is_empty());
    }

    #[test]
    fn test_panicking_body_fails_and_later_cases_still_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ReportSession::in_dir(dir.path());
        let cases = vec![
            TestCase::new("t::first", |_: &mut dyn Page| Ok(())),
            TestCase::new("t::panics", |_: &mut dyn Page| {
                let empty: Vec<u32> = Vec::new();
                let index = empty.len() + 3;
                ensure(empty[index] == 0, "unreachable")
            }),
            TestCase::new("t::after", |page: &mut dyn Page| {
                ensure(page.current_url()?.contains("login"), "expected login page")
            }),
        ];

        let summary = run_suite(&mut session, cases, mock);

        assert_eq!((summary.total, summary.passed, summary.failed), (3, 2, 1));
        assert_eq!(summary.exit_status, EXIT_TESTS_FAILED);
        let record = session.store().find("t::panics").unwrap();
        assert_eq!(record.outcome(), Outcome::Failed);
        assert!(record.failure_detail().unwrap().starts_with("panicked: index out of bounds"));
        assert!(record.screenshot_path.is_some());
        for name in ["first.json", "panics.json", "after.json", "report.html", "report.zip"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }
    }

    #[test]
    fn test_failing_body_leaves_next_case_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ReportSession::in_dir(dir.path());
        let cases = vec![
            TestCase::new("t::explodes", |page: &mut dyn Page| {
                page.fill("h1", "typed", T)?;
                panic!("assertion blew up");
            }),
            TestCase::new("t::fresh", |page: &mut dyn Page| {
                let value = page.input_value("h1", T)?;
                ensure(value.is_empty(), format!("leaked input {value:?}"))
            }),
        ];

        let summary = run_suite(&mut session, cases, mock);

        assert_eq!((summary.passed, summary.failed), (1, 1));
        let exploded = session.store().find("t::explodes").unwrap();
        assert_eq!(exploded.failure_detail(), Some("panicked: assertion blew up"));
        assert_eq!(session.store().find("t::fresh").unwrap().outcome(), Outcome::Passed);
        assert_eq!(session.list_captures().unwrap().len(), 1);
    }
}
