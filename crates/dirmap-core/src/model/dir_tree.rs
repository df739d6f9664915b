/// Arena-backed directory tree with O(n) bottom-up size aggregation.
///
/// All directories live in a single `Vec<DirectoryStat>`. Relationships use
/// `DirIndex` (a thin `u32` wrapper) rather than heap pointers. A directory
/// is always pushed after its parent, so a reverse pass over the arena is a
/// post-order traversal: every child is finalized before its parent, with no
/// recursion and no explicit stack.
use super::dir_stat::{DirIndex, DirectoryStat};
use compact_str::CompactString;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-directory statistics produced by one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct DirTree {
    /// Arena: every directory in visit order. Index 0 is the root.
    dirs: Vec<DirectoryStat>,

    /// Path → arena index, used to find an entry's parent during the walk
    /// and by consumers that key stats by path.
    by_path: HashMap<PathBuf, DirIndex>,

    finalized: bool,
}

impl DirTree {
    /// Create an empty tree with pre-allocated capacity.
    pub fn with_capacity(estimated_dirs: usize) -> Self {
        Self {
            dirs: Vec::with_capacity(estimated_dirs),
            by_path: HashMap::with_capacity(estimated_dirs),
            finalized: false,
        }
    }

    /// Insert the scan root. Must be the first insertion.
    pub fn add_root(&mut self, path: PathBuf) -> DirIndex {
        debug_assert!(self.dirs.is_empty(), "root must be inserted first");
        let name = root_display_name(&path);
        self.push(DirectoryStat::new(path, name, String::new(), 0, None))
    }

    /// Insert a subdirectory of `parent`, prepending it to the sibling list.
    pub fn add_dir(&mut self, parent: DirIndex, path: PathBuf, name: &str) -> DirIndex {
        let parent_stat = &self.dirs[parent.idx()];
        let rel_path = if parent_stat.rel_path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", parent_stat.rel_path, name)
        };
        let depth = parent_stat.depth + 1;
        let old_first = parent_stat.first_child;

        let idx = self.push(DirectoryStat::new(
            path,
            CompactString::new(name),
            rel_path,
            depth,
            Some(parent),
        ));
        self.dirs[idx.idx()].next_sibling = old_first;
        self.dirs[parent.idx()].first_child = Some(idx);
        idx
    }

    /// Fold one file into `dir`'s direct totals.
    pub fn add_file(&mut self, dir: DirIndex, size: u64) {
        debug_assert!(!self.finalized, "tree is immutable once finalized");
        let stat = &mut self.dirs[dir.idx()];
        stat.direct_size += size;
        stat.direct_files += 1;
    }

    /// Flag a directory whose listing failed.
    pub fn mark_error(&mut self, dir: DirIndex) {
        self.dirs[dir.idx()].is_error = true;
    }

    fn push(&mut self, stat: DirectoryStat) -> DirIndex {
        debug_assert!(!self.finalized, "tree is immutable once finalized");
        let idx = DirIndex::new(self.dirs.len());
        self.by_path.insert(stat.path.clone(), idx);
        self.dirs.push(stat);
        idx
    }

    /// Compute recursive sizes and counts in a single bottom-up pass.
    ///
    /// Children are always inserted after their parent, so iterating in
    /// *reverse* guarantees every child is complete before it is added into
    /// its parent. Safe to call more than once: recursive fields are reset
    /// from the direct totals first.
    pub fn finalize(&mut self) {
        for stat in self.dirs.iter_mut() {
            stat.size = stat.direct_size;
            stat.file_count = stat.direct_files;
            stat.dir_count = 0;
        }

        for i in (0..self.dirs.len()).rev() {
            let stat = &self.dirs[i];
            let (size, files, dirs) = (stat.size, stat.file_count, stat.dir_count);
            if let Some(parent) = stat.parent {
                let p = &mut self.dirs[parent.idx()];
                p.size += size;
                p.file_count += files;
                p.dir_count += 1 + dirs;
            }
        }

        self.finalized = true;
    }

    /// The root statistics, if a root was inserted.
    pub fn root(&self) -> Option<&DirectoryStat> {
        self.dirs.first()
    }

    /// Arena index of the root, if a root was inserted.
    pub fn root_index(&self) -> Option<DirIndex> {
        (!self.dirs.is_empty()).then(|| DirIndex::new(0))
    }

    /// Look up the arena index of a directory by path.
    pub fn lookup(&self, path: &Path) -> Option<DirIndex> {
        self.by_path.get(path).copied()
    }

    /// Statistics for a directory by path.
    pub fn get(&self, path: &Path) -> Option<&DirectoryStat> {
        self.lookup(path).map(|idx| &self.dirs[idx.idx()])
    }

    /// Get the directory at the given index.
    #[inline]
    pub fn stat(&self, index: DirIndex) -> &DirectoryStat {
        &self.dirs[index.idx()]
    }

    /// Direct subdirectories of a directory (unsorted).
    pub fn children(&self, parent: DirIndex) -> Vec<DirIndex> {
        let mut children = Vec::new();
        let mut child = self.dirs[parent.idx()].first_child;
        while let Some(idx) = child {
            children.push(idx);
            child = self.dirs[idx.idx()].next_sibling;
        }
        children
    }

    /// Direct subdirectories sorted by recursive size descending, then name.
    pub fn children_sorted_by_size(&self, parent: DirIndex) -> Vec<DirIndex> {
        let mut children = self.children(parent);
        children.sort_by(|a, b| {
            let (a, b) = (&self.dirs[a.idx()], &self.dirs[b.idx()]);
            b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name))
        });
        children
    }

    /// Sum of the recursive sizes of each directory's immediate children,
    /// indexed by arena position.
    pub fn child_size_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.dirs.len()];
        for stat in &self.dirs {
            if let Some(parent) = stat.parent {
                sums[parent.idx()] += stat.size;
            }
        }
        sums
    }

    /// All directories in visit order (root first).
    pub fn iter(&self) -> impl Iterator<Item = (DirIndex, &DirectoryStat)> {
        self.dirs
            .iter()
            .enumerate()
            .map(|(i, stat)| (DirIndex::new(i), stat))
    }

    /// Total number of directories in the tree, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` if the tree contains no directories.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Derive a display name for the scan root.
fn root_display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy().trim_end_matches(['/', '\\'])),
    }
}
