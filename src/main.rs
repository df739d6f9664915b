//! dirmap: directory size mapper.
//!
//! Thin binary entry point. Scanning lives in `dirmap-core`, rendering in
//! `dirmap-report`.

use anyhow::{bail, Context};
use dirmap_core::model::size::{format_count, format_size};
use dirmap_core::model::DepthLimit;
use dirmap_core::scanner::{start_scan, ScanOptions, ScanProgress, DEFAULT_IGNORE_GLOBS};
use dirmap_core::treemap::{GroupingDepth, Overflow};
use dirmap_report::options::{
    DEFAULT_LARGEST_FILES, DEFAULT_TREEMAP_MAX_ITEMS, DEFAULT_TREE_MAX_ENTRIES,
};
use dirmap_report::{render_outputs, ReportOptions};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about = "Map a directory: Markdown report, text tree and squarified SVG treemap of where the bytes are."
)]
pub struct Args {
    /// Directory to scan.
    #[arg()]
    root: PathBuf,

    /// Where to write the report. Defaults to the scanned directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Count entries whose name starts with a dot.
    #[arg(long)]
    include_hidden: bool,

    /// Follow symbolic links instead of skipping them. Links that loop back
    /// to an ancestor are reported as warnings.
    #[arg(long)]
    follow_symlinks: bool,

    /// `;`-separated globs matched against root-relative paths.
    #[arg(long, default_value_t = DEFAULT_IGNORE_GLOBS.join(";"))]
    ignore: String,

    /// Tree view depth (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    tree_depth: usize,

    #[arg(long, default_value_t = DEFAULT_TREE_MAX_ENTRIES)]
    tree_max_entries: usize,

    /// Rows in the largest-files table.
    #[arg(long, default_value_t = DEFAULT_LARGEST_FILES)]
    largest_files: usize,

    /// Add SHA-256 of each listed largest file. Reads them in full.
    #[arg(long)]
    hash_largest_files: bool,

    /// Treemap grouping depth (0 = one bucket per directory).
    #[arg(long, default_value_t = 0)]
    treemap_depth: usize,

    #[arg(long, default_value_t = DEFAULT_TREEMAP_MAX_ITEMS)]
    treemap_max_items: usize,

    /// Drop buckets beyond the item cap instead of merging them into one
    /// "other" rectangle.
    #[arg(long)]
    drop_overflow: bool,

    /// Also write a JSON summary.
    #[arg(long)]
    json: bool,

    /// Also write CSV tables of the largest files and extensions.
    #[arg(long)]
    csv: bool,

    /// Debug-level logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let scan_options = ScanOptions {
        follow_symlinks: args.follow_symlinks,
        include_hidden: args.include_hidden,
        ignore_globs: ScanOptions::parse_globs(&args.ignore),
    };
    let report_options = ReportOptions {
        tree_depth: DepthLimit::from_level(args.tree_depth),
        tree_max_entries: args.tree_max_entries,
        largest_files: args.largest_files,
        hash_largest_files: args.hash_largest_files,
        treemap_depth: GroupingDepth::from_level(args.treemap_depth),
        treemap_max_items: args.treemap_max_items,
        treemap_overflow: if args.drop_overflow {
            Overflow::Drop
        } else {
            Overflow::Merge
        },
        json: args.json,
        csv: args.csv,
    };
    let out_dir = args.out_dir.clone().unwrap_or_else(|| args.root.clone());

    let handle = start_scan(args.root.clone(), scan_options.clone(), report_options.largest_files)
        .context("failed to start scan")?;

    let mut failure = None;
    let scan = handle.wait(|message| match message {
        ScanProgress::Update(update) => tracing::info!(
            "{} files, {} dirs, {} so far ({})",
            format_count(update.files_found),
            format_count(update.dirs_found),
            format_size(update.total_size),
            update.current_path
        ),
        ScanProgress::Failed(reason) => failure = Some(reason.clone()),
        _ => {}
    });
    let Some(scan) = scan else {
        bail!(
            "scan of {} did not complete: {}",
            args.root.display(),
            failure.as_deref().unwrap_or("cancelled")
        );
    };

    if scan.is_incomplete() {
        tracing::warn!(
            "{} paths could not be read; totals may be incomplete",
            scan.warnings.len()
        );
    }

    let paths = render_outputs(&scan, &out_dir, &scan_options, &report_options)
        .with_context(|| format!("failed to write report into {}", out_dir.display()))?;

    println!("Wrote: {}", paths.markdown.display());
    println!("Wrote: {}", paths.treemap.display());
    for extra in [&paths.json, &paths.largest_files_csv, &paths.extensions_csv]
        .into_iter()
        .flatten()
    {
        println!("Wrote: {}", extra.display());
    }

    Ok(())
}
