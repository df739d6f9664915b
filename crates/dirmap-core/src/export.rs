/// Machine-readable exports of a finished scan.
///
/// [`ScanSummary`] is the JSON document a report can embed or write next to
/// its human-readable output; the CSV writers flatten the largest-files list
/// and the extension histogram into one row per entry.
use crate::analysis::ExtensionTotals;
use crate::error::ExportError;
use crate::model::size::format_size;
use crate::model::FileFact;
use crate::scanner::{ScanResult, ScanWarning};
use crate::treemap::Bucket;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One directory directly below the root.
#[derive(Debug, Clone, Serialize)]
pub struct TopLevelDir<'a> {
    pub name: &'a str,
    pub size: u64,
    pub file_count: u64,
    pub dir_count: u64,
    pub is_error: bool,
}

/// Borrowed, serializable view of a [`ScanResult`] plus its treemap buckets.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary<'a> {
    pub root: &'a Path,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub total_size: u64,
    pub total_files: u64,
    pub total_dirs: u64,
    pub incomplete: bool,
    pub top_level_dirs: Vec<TopLevelDir<'a>>,
    pub largest_files: &'a [FileFact],
    pub extensions: &'a [ExtensionTotals],
    pub buckets: &'a [Bucket],
    pub warnings: &'a [ScanWarning],
}

impl<'a> ScanSummary<'a> {
    pub fn new(scan: &'a ScanResult, buckets: &'a [Bucket]) -> Self {
        let top_level_dirs = scan
            .tree
            .root_index()
            .map(|root| {
                scan.tree
                    .children_sorted_by_size(root)
                    .into_iter()
                    .map(|idx| {
                        let stat = scan.tree.stat(idx);
                        TopLevelDir {
                            name: stat.name.as_str(),
                            size: stat.size,
                            file_count: stat.file_count,
                            dir_count: stat.dir_count,
                            is_error: stat.is_error,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            root: &scan.root,
            started_at: scan.started_at,
            finished_at: scan.finished_at,
            elapsed_secs: scan.elapsed.as_secs_f64(),
            total_size: scan.total_size(),
            total_files: scan.total_files(),
            total_dirs: scan.total_dirs(),
            incomplete: scan.is_incomplete(),
            top_level_dirs,
            largest_files: &scan.largest_files,
            extensions: &scan.extensions,
            buckets,
            warnings: &scan.warnings,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct LargestFileRow<'a> {
    rank: usize,
    size_bytes: u64,
    size: String,
    modified: String,
    path: String,
    name: &'a str,
}

#[derive(Serialize)]
struct ExtensionRow<'a> {
    extension: &'a str,
    files: u64,
    size_bytes: u64,
    size: String,
    percent: f64,
}

/// Write the largest-files list as CSV, one row per file in rank order.
pub fn write_largest_files_csv<W: Write>(writer: W, files: &[FileFact]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, file) in files.iter().enumerate() {
        let modified = file
            .modified
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
            .unwrap_or_default();
        wtr.serialize(LargestFileRow {
            rank: i + 1,
            size_bytes: file.size,
            size: format_size(file.size),
            modified,
            path: file.path.to_string_lossy().into_owned(),
            name: file.name.as_str(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the extension histogram as CSV. `total_size` is the denominator for
/// the percentage column; zero yields 0 %.
pub fn write_extensions_csv<W: Write>(
    writer: W,
    extensions: &[ExtensionTotals],
    total_size: u64,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for ext in extensions {
        let percent = if total_size == 0 {
            0.0
        } else {
            ext.bytes as f64 / total_size as f64 * 100.0
        };
        wtr.serialize(ExtensionRow {
            extension: ext.extension.as_str(),
            files: ext.files,
            size_bytes: ext.bytes,
            size: format_size(ext.bytes),
            percent: (percent * 100.0).round() / 100.0,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
