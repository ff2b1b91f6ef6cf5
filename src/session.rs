//! Report session: one test-execution run and its report directory.
//!
//! The session owns the [`ResultStore`] and is passed explicitly to every
//! lifecycle hook:
//! - [`ReportSession::record_outcome`] once the test body has finished
//! - [`ReportSession::finish_test`] during teardown (screenshot on failure,
//!   then the per-test record file)
//! - [`ReportSession::finish`] once at the end (HTML report, then archive)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::browser::Page;
use crate::config::Config;
use crate::report::{
    ArchiveSummary, Outcome, RenderContext, ReportResult, ResultStore, TestOutcomeRecord,
    archive_report_dir, capture_failure, record_file_name, record_test, write_report,
};
use crate::runner::RunSummary;

/// A reporting session rooted at a report directory
#[derive(Debug)]
pub struct ReportSession {
    /// Directory holding every artifact of the run
    pub dir: PathBuf,
    store: ResultStore,
}

/// Files written by [`ReportSession::finish`]
#[derive(Debug, Clone)]
pub struct SessionArtifacts {
    pub report: PathBuf,
    pub archive: ArchiveSummary,
}

impl ReportSession {
    /// Create a session writing into `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            store: ResultStore::new(),
        }
    }

    /// Create a session for the configured report directory
    pub fn from_config(config: &Config) -> Self {
        Self::in_dir(&config.report.dir)
    }

    /// Resume a session from the per-test records already in `dir`
    pub fn resume(dir: impl Into<PathBuf>) -> ReportResult<Self> {
        let dir = dir.into();
        let store = ResultStore::load_dir(&dir)?;
        info!(dir = %dir.display(), records = store.len(), "loaded per-test records");
        Ok(Self { dir, store })
    }

    /// Create the report directory if absent. Existing contents are kept.
    pub fn init(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        debug!(dir = %self.dir.display(), "report directory ready");
        Ok(())
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Counts and exit status of the records collected so far
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(self.store.all())
    }

    /// Another recorded test whose per-test file has the same name as
    /// `test_id`'s
    pub fn record_file_conflict(&self, test_id: &str) -> Option<&str> {
        let file_name = record_file_name(test_id);
        self.store
            .all()
            .iter()
            .map(|r| r.test_id.as_str())
            .find(|other| *other != test_id && record_file_name(other) == file_name)
    }

    /// The test's outcome is known
    pub fn record_outcome(&mut self, record: TestOutcomeRecord) {
        self.store.append(record);
    }

    /// Teardown hook for one test.
    ///
    /// For a failed test with a page available, the page URL and a screenshot
    /// are attached to its record. A test that never got a record (for
    /// example its setup errored) gets a minimal one with `fallback` as its
    /// outcome. The record is then written to its per-test file. Nothing
    /// here can fail the test: capture and write errors are logged only.
    /// Returns the per-test file path when it was written.
    pub fn finish_test(
        &mut self,
        test_id: &str,
        page: Option<&dyn Page>,
        fallback: Outcome,
    ) -> Option<PathBuf> {
        if self.store.find(test_id).is_none() {
            let record = match fallback {
                Outcome::Passed => TestOutcomeRecord::passed(test_id, 0.0),
                Outcome::Failed => TestOutcomeRecord::failed(test_id, "", 0.0),
                Outcome::Skipped => TestOutcomeRecord::skipped(test_id, 0.0),
                Outcome::Errored => TestOutcomeRecord::errored(test_id, 0.0),
            };
            debug!(test_id, outcome = %fallback, "synthesized record at teardown");
            self.store.append(record);
        }

        if let Some(other) = self.record_file_conflict(test_id) {
            warn!(
                test_id,
                other,
                file = %record_file_name(test_id),
                "per-test record file overwrites another test's record"
            );
        }

        let dir = self.dir.clone();
        let record = self.store.find_mut(test_id)?;
        if record.outcome() == Outcome::Failed {
            if let Some(page) = page {
                let capture = capture_failure(page, &dir, test_id);
                record.attach_capture(&capture.page_url, capture.screenshot_path.as_deref());
            }
        }
        record_test(&dir, record)
    }

    /// Render `report.html`, then archive the whole directory
    pub fn finish(&self, exit_status: i32) -> ReportResult<SessionArtifacts> {
        let ctx = RenderContext::new(&self.dir, exit_status);
        let report = write_report(self.store.all(), &ctx)?;
        let archive = archive_report_dir(&self.dir)?;
        Ok(SessionArtifacts { report, archive })
    }

    /// List all PNG files in the report directory
    pub fn list_captures(&self) -> std::io::Result<Vec<PathBuf>> {
        list_with_extension(&self.dir, "png")
    }
}

fn list_with_extension(dir: &Path, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if dir.exists() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == ext).unwrap_or(false) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
