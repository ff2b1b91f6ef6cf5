pub mod archive;
pub mod html;
pub mod recorder;
pub mod screenshot;
pub mod store;
pub mod types;

pub use archive::{ARCHIVE_FILE_NAME, ArchiveSummary, archive_report_dir};
pub use html::{REPORT_FILE_NAME, RenderContext, escape_html, format_duration, render_report, write_report};
pub use recorder::{record_file_name, record_test, test_name, write_record_file};
pub use screenshot::{FailureCapture, capture_failure, sanitize_test_id, screenshot_file_name};
pub use store::ResultStore;
pub use types::{Outcome, ReportError, ReportResult, TestOutcomeRecord};
