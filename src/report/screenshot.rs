//! Failure screenshots.
//!
//! Capture is best effort: a page that was already torn down, or any other
//! capture error, yields [`FailureCapture`] with no screenshot instead of an
//! error, so failure handling can never fail the run itself.

use chrono::{DateTime, Local};
use std::path::Path;

use tracing::{debug, warn};

use crate::browser::Page;

/// Timestamp format used in screenshot names (second granularity)
pub const SCREENSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// What was captured from the page when a test failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureCapture {
    /// URL of the page, empty if the page could not report it
    pub page_url: String,
    /// Image path relative to the report directory, `None` if capture failed
    pub screenshot_path: Option<String>,
}

/// Replace hierarchical delimiters and path separators with underscores
pub fn sanitize_test_id(test_id: &str) -> String {
    test_id.replace("::", "_").replace(['/', '\\'], "_")
}

/// Deterministic screenshot file name for a test at a point in time
pub fn screenshot_file_name(test_id: &str, at: &DateTime<Local>) -> String {
    format!(
        "{}-{}.png",
        sanitize_test_id(test_id),
        at.format(SCREENSHOT_TIMESTAMP_FORMAT)
    )
}

/// Capture the failing page into `report_dir`.
///
/// Never returns an error; a failed capture is logged and reported as an
/// absent screenshot.
pub fn capture_failure(page: &dyn Page, report_dir: &Path, test_id: &str) -> FailureCapture {
    let page_url = page.current_url().unwrap_or_default();
    let file_name = screenshot_file_name(test_id, &Local::now());
    let path = report_dir.join(&file_name);

    let screenshot_path = match page.screenshot(&path, true) {
        Ok(()) => {
            debug!(test_id, path = %path.display(), "captured failure screenshot");
            Some(file_name)
        }
        Err(e) => {
            warn!(test_id, error = %e, "screenshot capture failed; continuing without it");
            None
        }
    };

    FailureCapture {
        page_url,
        screenshot_path,
    }
}
