/// Report configuration.
use dirmap_core::model::DepthLimit;
use dirmap_core::treemap::{GroupingDepth, Overflow};
use serde::Serialize;

/// Lines emitted by the tree view before it is cut short.
pub const DEFAULT_TREE_MAX_ENTRIES: usize = 5_000;
/// Rows in the largest-files table.
pub const DEFAULT_LARGEST_FILES: usize = 30;
/// Rectangles drawn in the treemap.
pub const DEFAULT_TREEMAP_MAX_ITEMS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    /// How deep the text tree expands directories.
    pub tree_depth: DepthLimit,
    pub tree_max_entries: usize,
    pub largest_files: usize,
    /// Add a SHA-256 column to the largest-files table. Reads every listed
    /// file in full.
    pub hash_largest_files: bool,
    pub treemap_depth: GroupingDepth,
    pub treemap_max_items: usize,
    pub treemap_overflow: Overflow,
    /// Also write `<stem>_dir_map.json`.
    pub json: bool,
    /// Also write `<stem>_largest_files.csv` and `<stem>_extensions.csv`.
    pub csv: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tree_depth: DepthLimit::Unbounded,
            tree_max_entries: DEFAULT_TREE_MAX_ENTRIES,
            largest_files: DEFAULT_LARGEST_FILES,
            hash_largest_files: false,
            treemap_depth: GroupingDepth::Unbounded,
            treemap_max_items: DEFAULT_TREEMAP_MAX_ITEMS,
            treemap_overflow: Overflow::Merge,
            json: false,
            csv: false,
        }
    }
}
