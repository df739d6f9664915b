/// Output of one aggregation pass.
use crate::analysis::ExtensionTotals;
use crate::model::{DirTree, FileFact};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A non-fatal problem met during the walk. The offending entry is
/// excluded from every total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

impl ScanWarning {
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Everything a report needs from a scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Per-directory recursive statistics, finalized.
    pub tree: DirTree,

    /// Extension histogram, bytes descending.
    pub extensions: Vec<ExtensionTotals>,

    /// The N largest files across the whole tree, size descending.
    pub largest_files: Vec<FileFact>,

    /// Files residing directly in the root, in walk order.
    pub root_files: Vec<FileFact>,

    /// Entries that could not be read. Non-empty means totals may be
    /// incomplete.
    pub warnings: Vec<ScanWarning>,
}

impl ScanResult {
    /// Recursive size of the root.
    pub fn total_size(&self) -> u64 {
        self.tree.root().map_or(0, |r| r.size)
    }

    /// Recursive file count of the root.
    pub fn total_files(&self) -> u64 {
        self.tree.root().map_or(0, |r| r.file_count)
    }

    /// Recursive subdirectory count of the root (root excluded).
    pub fn total_dirs(&self) -> u64 {
        self.tree.root().map_or(0, |r| r.dir_count)
    }

    /// Whether any entry was skipped because it could not be read.
    pub fn is_incomplete(&self) -> bool {
        !self.warnings.is_empty()
    }
}
