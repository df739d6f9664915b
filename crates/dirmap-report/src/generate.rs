/// Scan a directory and write every report file for it.
use crate::error::ReportError;
use crate::markdown::render_markdown;
use crate::options::ReportOptions;
use crate::svg::{render_treemap_svg, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use dirmap_core::export::{write_extensions_csv, write_largest_files_csv, ScanSummary};
use dirmap_core::scanner::{aggregate, ScanOptions, ScanResult};
use dirmap_core::treemap::{bucketize, truncate};
use dirmap_core::ExportError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Paths of the files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub treemap: PathBuf,
    pub json: Option<PathBuf>,
    pub largest_files_csv: Option<PathBuf>,
    pub extensions_csv: Option<PathBuf>,
}

/// File-name prefix for a root: its last component with spaces replaced by
/// underscores.
pub fn output_stem(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "root".to_string())
}

/// Scan `root` and write the report into `out_dir`, creating it if needed.
pub fn generate_outputs(
    root: &Path,
    out_dir: &Path,
    scan_options: &ScanOptions,
    report_options: &ReportOptions,
) -> Result<ReportPaths, ReportError> {
    let scan = aggregate(root, scan_options, report_options.largest_files)?;
    render_outputs(&scan, out_dir, scan_options, report_options)
}

/// Write the report for a finished scan into `out_dir`.
///
/// `scan_options` must be the options `scan` ran with; the tree view re-lists
/// directories under them.
pub fn render_outputs(
    scan: &ScanResult,
    out_dir: &Path,
    scan_options: &ScanOptions,
    report_options: &ReportOptions,
) -> Result<ReportPaths, ReportError> {
    let start = Instant::now();
    fs::create_dir_all(out_dir).map_err(ReportError::io(out_dir))?;

    let stem = output_stem(&scan.root);
    let markdown = out_dir.join(format!("{stem}_dir_map.md"));
    let treemap = out_dir.join(format!("{stem}_treemap.svg"));

    let buckets = truncate(
        bucketize(scan, report_options.treemap_depth),
        report_options.treemap_max_items,
        report_options.treemap_overflow,
    );
    debug!("Treemap: {} buckets", buckets.len());

    let title = format!("Treemap: {}", scan.root.display());
    let svg = render_treemap_svg(&buckets, &title, DEFAULT_WIDTH, DEFAULT_HEIGHT);
    fs::write(&treemap, svg).map_err(ReportError::io(&treemap))?;

    // Both files live in `out_dir`, so the link is the bare file name.
    let link = format!("{stem}_treemap.svg");
    let policy = scan_options.policy(&scan.root)?;
    let md = render_markdown(scan, scan_options, report_options, &policy, Some(&link));
    fs::write(&markdown, md).map_err(ReportError::io(&markdown))?;

    let json = if report_options.json {
        let path = out_dir.join(format!("{stem}_dir_map.json"));
        let summary = ScanSummary::new(scan, &buckets);
        export_to(&path, |w| summary.write_json(w))?;
        Some(path)
    } else {
        None
    };

    let (largest_files_csv, extensions_csv) = if report_options.csv {
        let largest = out_dir.join(format!("{stem}_largest_files.csv"));
        export_to(&largest, |w| write_largest_files_csv(w, &scan.largest_files))?;
        let extensions = out_dir.join(format!("{stem}_extensions.csv"));
        export_to(&extensions, |w| {
            write_extensions_csv(w, &scan.extensions, scan.total_size())
        })?;
        (Some(largest), Some(extensions))
    } else {
        (None, None)
    };

    info!(
        "Report for {} written to {} in {:?}",
        scan.root.display(),
        out_dir.display(),
        start.elapsed()
    );

    Ok(ReportPaths {
        markdown,
        treemap,
        json,
        largest_files_csv,
        extensions_csv,
    })
}

fn export_to(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), ExportError>,
) -> Result<(), ReportError> {
    let file = File::create(path).map_err(ReportError::io(path))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|source| ReportError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(ReportError::io(path))
}
