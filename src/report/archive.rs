//! Bundles the report directory into a single zip for distribution.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::report::types::ReportResult;

/// File name of the archive inside the report directory
pub const ARCHIVE_FILE_NAME: &str = "report.zip";

/// What ended up in the archive
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entry names, relative to the report directory with `/` separators
    pub entries: Vec<String>,
}

/// Files under `report_dir` as `(archive name, path)` pairs, sorted by name,
/// excluding the archive itself.
pub fn collect_entries(report_dir: &Path) -> ReportResult<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(report_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(report_dir) else {
            continue;
        };
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if name == ARCHIVE_FILE_NAME {
            continue;
        }
        entries.push((name, entry.path().to_path_buf()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Write `report.zip` containing every file of `report_dir`.
///
/// The file list is collected before the archive is created, and any archive
/// left by a previous run is excluded, so the archive never contains itself.
pub fn archive_report_dir(report_dir: &Path) -> ReportResult<ArchiveSummary> {
    let entries = collect_entries(report_dir)?;
    let path = report_dir.join(ARCHIVE_FILE_NAME);

    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, file_path) in &entries {
        zip.start_file(name.as_str(), options)?;
        let mut file = File::open(file_path)?;
        io::copy(&mut file, &mut zip)?;
    }
    zip.finish()?;

    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    info!(path = %path.display(), entries = entries.len(), bytes = size, "wrote report archive");

    Ok(ArchiveSummary {
        path,
        entries: entries.into_iter().map(|(name, _)| name).collect(),
    })
}
