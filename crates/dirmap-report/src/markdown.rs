/// The Markdown report.
use crate::hash::sha256_or_unreadable;
use crate::options::ReportOptions;
use crate::tree_view::tree_lines;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use dirmap_core::model::size::{format_count, format_size};
use dirmap_core::scanner::{ScanOptions, ScanResult, TraversalPolicy};
use std::time::SystemTime;

/// Warnings listed before the rest are summarized in one line.
pub const MAX_LISTED_WARNINGS: usize = 200;

fn utc_seconds(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn local_seconds(ts: Option<SystemTime>) -> String {
    ts.map_or_else(
        || "<unknown>".to_string(),
        |t| DateTime::<Local>::from(t).format("%Y-%m-%dT%H:%M:%S").to_string(),
    )
}

/// Render the report for `scan`.
///
/// `policy` re-lists directories for the tree view and must be the policy the
/// scan ran under. `treemap_link` is the SVG path relative to the report.
pub fn render_markdown(
    scan: &ScanResult,
    scan_options: &ScanOptions,
    report_options: &ReportOptions,
    policy: &TraversalPolicy,
    treemap_link: Option<&str>,
) -> String {
    let mut md: Vec<String> = Vec::new();

    md.push(format!("# Directory Map: `{}`", scan.root.display()));
    md.push(String::new());
    md.push(format!(
        "- **Scanned (UTC):** {} → {}  ",
        utc_seconds(scan.started_at),
        utc_seconds(scan.finished_at)
    ));
    md.push(format!("- **Elapsed:** {:.2}s  ", scan.elapsed.as_secs_f64()));
    md.push(format!(
        "- **Total size:** {} ({} bytes)  ",
        format_size(scan.total_size()),
        format_count(scan.total_size())
    ));
    md.push(format!("- **Files:** {}  ", format_count(scan.total_files())));
    md.push(format!("- **Directories:** {}  ", format_count(scan.total_dirs())));
    md.push(String::new());

    md.push("## Options".to_string());
    md.push(String::new());
    md.push(format!("- **Include hidden:** {}", scan_options.include_hidden));
    md.push(format!("- **Follow symlinks:** {}", scan_options.follow_symlinks));
    let globs = if scan_options.ignore_globs.is_empty() {
        "(none)".to_string()
    } else {
        scan_options.ignore_globs.join(", ")
    };
    md.push(format!("- **Ignore globs:** {globs}"));
    md.push(format!(
        "- **Tree depth:** {} (max entries: {})",
        report_options.tree_depth,
        format_count(report_options.tree_max_entries as u64)
    ));
    md.push(format!(
        "- **Hash largest files (SHA-256):** {}",
        report_options.hash_largest_files
    ));
    md.push(format!(
        "- **Treemap depth:** {} (max items: {}, overflow: {:?})",
        report_options.treemap_depth,
        format_count(report_options.treemap_max_items as u64),
        report_options.treemap_overflow
    ));
    md.push(String::new());

    if let Some(link) = treemap_link {
        md.push("## Treemap (size by bytes)".to_string());
        md.push(String::new());
        md.push(format!("![Treemap]({link})"));
        md.push(String::new());
    }

    md.push("## Tree view".to_string());
    md.push(String::new());
    md.push("```text".to_string());
    md.extend(tree_lines(
        &scan.tree,
        policy,
        report_options.tree_depth,
        report_options.tree_max_entries,
    ));
    md.push("```".to_string());
    md.push(String::new());

    md.push("## Largest files".to_string());
    md.push(String::new());
    if scan.largest_files.is_empty() {
        md.push("(none)".to_string());
    } else if report_options.hash_largest_files {
        md.push("| Size | Modified | SHA-256 | Path |".to_string());
        md.push("|---:|---|---|---|".to_string());
        for file in &scan.largest_files {
            md.push(format!(
                "| {} | {} | `{}` | `{}` |",
                format_size(file.size),
                local_seconds(file.modified),
                sha256_or_unreadable(&file.path),
                file.path.display()
            ));
        }
    } else {
        md.push("| Size | Modified | Path |".to_string());
        md.push("|---:|---|---|".to_string());
        for file in &scan.largest_files {
            md.push(format!(
                "| {} | {} | `{}` |",
                format_size(file.size),
                local_seconds(file.modified),
                file.path.display()
            ));
        }
    }
    md.push(String::new());

    md.push("## Extension breakdown".to_string());
    md.push(String::new());
    md.push("| Extension | Files | Bytes | Human |".to_string());
    md.push("|---|---:|---:|---:|".to_string());
    for ext in &scan.extensions {
        md.push(format!(
            "| `{}` | {} | {} | {} |",
            ext.extension,
            format_count(ext.files),
            format_count(ext.bytes),
            format_size(ext.bytes)
        ));
    }
    md.push(String::new());

    if !scan.warnings.is_empty() {
        md.push("## Warnings / errors".to_string());
        md.push(String::new());
        md.push("Some paths could not be read; totals may be incomplete:".to_string());
        md.push(String::new());
        for warning in scan.warnings.iter().take(MAX_LISTED_WARNINGS) {
            md.push(format!("- {warning}"));
        }
        if scan.warnings.len() > MAX_LISTED_WARNINGS {
            md.push(format!(
                "- … (truncated: {} more)",
                scan.warnings.len() - MAX_LISTED_WARNINGS
            ));
        }
        md.push(String::new());
    }

    let mut out = md.join("\n");
    out.push('\n');
    out
}
