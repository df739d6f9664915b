/// A single directory in the arena-allocated stat tree.
///
/// Only directories live in the arena. Individual files are folded into
/// their parent's direct totals as the walk sees them and are not retained
/// (apart from the top-N and root-level lists kept by the accumulator).
use compact_str::CompactString;
use std::path::PathBuf;

/// Lightweight index into the arena `Vec<DirectoryStat>`.
///
/// Uses `u32` to keep nodes small: supports up to ~4 billion directories,
/// which is more than enough for any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirIndex(pub u32);

impl DirIndex {
    /// Create a new `DirIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "DirIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Aggregated facts for one directory.
///
/// `direct_*` fields are filled while the walk visits the directory's own
/// entries. The recursive fields (`size`, `file_count`, `dir_count`) are
/// only meaningful after [`DirTree::finalize`](super::DirTree::finalize)
/// has rolled the tree up, children before parents.
#[derive(Debug, Clone)]
pub struct DirectoryStat {
    /// Absolute (as-walked) path of the directory.
    pub path: PathBuf,

    /// Directory name only. The root uses its display name.
    pub name: CompactString,

    /// Path relative to the scan root with `/` separators. Empty for the root.
    pub rel_path: String,

    /// Number of path segments below the root (root = 0).
    pub depth: usize,

    /// Parent directory. `None` for the root.
    pub parent: Option<DirIndex>,

    /// First child directory; siblings form a singly-linked list.
    pub first_child: Option<DirIndex>,

    /// Next sibling under the same parent.
    pub next_sibling: Option<DirIndex>,

    /// Bytes of files residing immediately in this directory.
    pub direct_size: u64,

    /// Number of files residing immediately in this directory.
    pub direct_files: u64,

    /// Recursive total bytes.
    pub size: u64,

    /// Recursive file count.
    pub file_count: u64,

    /// Recursive subdirectory count, excluding the directory itself.
    pub dir_count: u64,

    /// `true` if the directory could not be listed. It stays in the tree
    /// with zero contents so the report can show where data is missing.
    pub is_error: bool,
}

impl DirectoryStat {
    pub(crate) fn new(
        path: PathBuf,
        name: CompactString,
        rel_path: String,
        depth: usize,
        parent: Option<DirIndex>,
    ) -> Self {
        Self {
            path,
            name,
            rel_path,
            depth,
            parent,
            first_child: None,
            next_sibling: None,
            direct_size: 0,
            direct_files: 0,
            size: 0,
            file_count: 0,
            dir_count: 0,
            is_error: false,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
