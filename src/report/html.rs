//! Aggregate HTML report.

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::report::types::{Outcome, ReportResult, TestOutcomeRecord};

/// File name of the aggregate report inside the report directory
pub const REPORT_FILE_NAME: &str = "report.html";

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;padding:18px}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:8px}\
th{background:#f4f6f8}\
tr.fail{background:#ffecec}\
tr.error{background:#fff4e0}\
tr.pass{background:#ecffec}\
details{margin-top:6px}\
pre{white-space:pre-wrap}";

/// Inputs for rendering besides the records themselves
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Directory screenshot paths are relative to
    pub report_dir: PathBuf,
    /// When the report was generated
    pub run_at: DateTime<Local>,
    /// Exit status of the test process
    pub exit_status: i32,
}

impl RenderContext {
    pub fn new(report_dir: impl Into<PathBuf>, exit_status: i32) -> Self {
        Self {
            report_dir: report_dir.into(),
            run_at: Local::now(),
            exit_status,
        }
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format a duration as seconds with two decimals, or the raw value when it
/// is not a finite non-negative number.
pub fn format_duration(seconds: f64) -> String {
    if seconds.is_finite() && seconds >= 0.0 {
        format!("{:.2}s", seconds)
    } else {
        seconds.to_string()
    }
}

/// Render the full report document
pub fn render_report(records: &[TestOutcomeRecord], ctx: &RenderContext) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html><html><head><meta charset='utf-8'><title>Test Report</title>");
    let _ = write!(html, "<style>{}</style>", STYLE);
    html.push_str("</head><body>");

    let _ = write!(
        html,
        "<h1>Test Report</h1><p>Run at: {}</p>",
        escape_html(&ctx.run_at.to_rfc3339())
    );
    let count = |outcome: Outcome| records.iter().filter(|r| r.outcome() == outcome).count();
    let _ = write!(
        html,
        "<p>Total tests: {} | Exit status: {}</p>\
         <p>Passed: {} | Failed: {} | Skipped: {} | Errored: {}</p>",
        records.len(),
        ctx.exit_status,
        count(Outcome::Passed),
        count(Outcome::Failed),
        count(Outcome::Skipped),
        count(Outcome::Errored),
    );

    html.push_str("<table><thead>");
    html.push_str("<tr><th>Test</th><th>Result</th><th>Duration</th><th>Page</th><th>Screenshot</th></tr>");
    html.push_str("</thead><tbody>");
    for record in records {
        render_row(&mut html, record, &ctx.report_dir);
    }
    html.push_str("</tbody></table></body></html>");
    html
}

/// Only `http`/`https` page URLs become links
fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

fn render_row(html: &mut String, record: &TestOutcomeRecord, report_dir: &Path) {
    let class = match record.outcome().row_class() {
        "" => "result".to_string(),
        c => format!("result {}", c),
    };
    let _ = write!(html, "<tr class='{}'>", class);
    let _ = write!(html, "<td>{}</td>", escape_html(&record.test_id));
    let _ = write!(html, "<td>{}</td>", record.outcome());
    let _ = write!(html, "<td>{}</td>", format_duration(record.duration_seconds));

    match record.page_url.as_deref().filter(|u| is_web_url(u)) {
        Some(url) => {
            let _ = write!(
                html,
                "<td><a href='{}' target='_blank'>open</a></td>",
                escape_html(url)
            );
        }
        None => html.push_str("<td>-</td>"),
    }

    match screenshot_link(record, report_dir) {
        Some(rel) => {
            let rel = escape_html(&rel);
            let _ = write!(
                html,
                "<td><a href='./{rel}' target='_blank'><img src='./{rel}' style='height:60px'></a></td>"
            );
        }
        None => html.push_str("<td>-</td>"),
    }
    html.push_str("</tr>");

    if let Some(detail) = record.failure_detail() {
        let _ = write!(
            html,
            "<tr class='detail'><td colspan='5'><details><summary>Failure details</summary><pre>{}</pre></details></td></tr>",
            escape_html(detail)
        );
    }
}

/// Screenshot path as a `/`-separated link, if the file is still on disk
fn screenshot_link(record: &TestOutcomeRecord, report_dir: &Path) -> Option<String> {
    let rel = record.screenshot_path.as_deref().filter(|p| !p.is_empty())?;
    if report_dir.join(rel).is_file() {
        Some(rel.replace('\\', "/"))
    } else {
        warn!(test_id = %record.test_id, screenshot = rel, "screenshot missing from report directory");
        None
    }
}

/// Render and write `report.html` into the context's report directory
pub fn write_report(records: &[TestOutcomeRecord], ctx: &RenderContext) -> ReportResult<PathBuf> {
    let path = ctx.report_dir.join(REPORT_FILE_NAME);
    fs::write(&path, render_report(records, ctx))?;
    info!(path = %path.display(), tests = records.len(), "wrote HTML report");
    Ok(path)
}
