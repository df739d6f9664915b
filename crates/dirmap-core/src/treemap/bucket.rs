/// Bucketizer: partitions a scan's bytes into disjoint treemap buckets.
///
/// Every byte is attributed at exactly one place:
///
/// - files directly in the root get one bucket each, labeled by name;
/// - a directory shallower than the grouping depth contributes only its
///   *direct* files (`"<rel>/·files"`);
/// - a directory exactly at the grouping depth contributes its whole
///   subtree (`"<rel>/"`);
/// - anything deeper is already inside an ancestor's subtree bucket and
///   contributes nothing.
///
/// With [`GroupingDepth::Unbounded`] every directory is "shallower", so the
/// result is one direct-files bucket per directory. Either way the bucket
/// sizes sum to the root's total.
use crate::model::{DepthLimit, DirTree, FileFact};
use crate::scanner::ScanResult;
use compact_str::{format_compact, CompactString};
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

/// Grouping depth: `Exact(n)` groups whole subtrees at `n` segments below
/// the root; `Unbounded` keeps one bucket per directory.
pub type GroupingDepth = DepthLimit;

/// Marker appended to a directory's label for its direct-files bucket.
pub const DIRECT_FILES_SUFFIX: &str = "/·files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BucketKind {
    /// A single file directly in the root.
    File,
    /// Files residing immediately in one directory.
    DirectFiles,
    /// A directory's entire recursive subtree.
    Subtree,
    /// Buckets folded together by [`truncate`] with [`Overflow::Merge`].
    Other,
}

/// A labeled, disjoint slice of the scanned bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: CompactString,
    pub size: u64,
    pub kind: BucketKind,
}

/// What happens to buckets beyond the item cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Overflow {
    /// Omit them. The treemap then shows less than the full total.
    Drop,
    /// Fold them into one trailing "other" bucket so the displayed area
    /// still accounts for every byte.
    #[default]
    Merge,
}

/// Ordered bucket list with label de-duplication.
#[derive(Default)]
struct BucketSet {
    buckets: Vec<Bucket>,
    by_label: HashMap<CompactString, usize>,
}

impl BucketSet {
    fn add(&mut self, label: CompactString, size: u64, kind: BucketKind) {
        if size == 0 {
            return;
        }
        if let Some(&i) = self.by_label.get(&label) {
            self.buckets[i].size += size;
            return;
        }
        self.by_label.insert(label.clone(), self.buckets.len());
        self.buckets.push(Bucket { label, size, kind });
    }

    fn into_sorted(self) -> Vec<Bucket> {
        let mut buckets = self.buckets;
        // Stable: equal sizes keep insertion order.
        buckets.sort_by(|a, b| b.size.cmp(&a.size));
        buckets
    }
}

/// Partition a finished scan into buckets, largest first.
pub fn bucketize(scan: &ScanResult, depth: GroupingDepth) -> Vec<Bucket> {
    bucketize_tree(&scan.tree, &scan.root_files, depth)
}

/// Partition a finalized tree plus its root-level files into buckets,
/// largest first.
pub fn bucketize_tree(tree: &DirTree, root_files: &[FileFact], depth: GroupingDepth) -> Vec<Bucket> {
    let mut set = BucketSet::default();

    for file in root_files {
        set.add(file.name.clone(), file.size, BucketKind::File);
    }

    let child_sums = tree.child_size_sums();
    for (idx, stat) in tree.iter() {
        // The root's own direct files are the per-file buckets above.
        if stat.is_root() {
            continue;
        }

        let wants_direct = match depth {
            DepthLimit::Unbounded => true,
            DepthLimit::Exact(d) if stat.depth < d.get() => true,
            DepthLimit::Exact(d) if stat.depth == d.get() => {
                set.add(
                    format_compact!("{}/", stat.rel_path),
                    stat.size,
                    BucketKind::Subtree,
                );
                false
            }
            // Already inside an ancestor's subtree bucket.
            DepthLimit::Exact(_) => false,
        };
        if !wants_direct {
            continue;
        }

        match stat.size.checked_sub(child_sums[idx.idx()]) {
            Some(direct) => set.add(
                format_compact!("{}{}", stat.rel_path, DIRECT_FILES_SUFFIX),
                direct,
                BucketKind::DirectFiles,
            ),
            None => {
                error!(
                    "children of {} sum to more than its total ({} > {})",
                    stat.rel_path,
                    child_sums[idx.idx()],
                    stat.size
                );
                debug_assert!(false, "negative direct-files size for {}", stat.rel_path);
            }
        }
    }

    set.into_sorted()
}

/// Cap a size-sorted bucket list at `max_items` entries.
///
/// With [`Overflow::Merge`] the last slot becomes an `Other` bucket carrying
/// everything that did not fit, and the list is re-sorted so it stays
/// largest first.
pub fn truncate(mut buckets: Vec<Bucket>, max_items: usize, overflow: Overflow) -> Vec<Bucket> {
    if buckets.len() <= max_items {
        return buckets;
    }
    if max_items == 0 {
        return Vec::new();
    }
    match overflow {
        Overflow::Drop => {
            buckets.truncate(max_items);
            buckets
        }
        Overflow::Merge => {
            let rest = buckets.split_off(max_items - 1);
            let size = rest.iter().map(|b| b.size).sum();
            buckets.push(Bucket {
                label: format_compact!("(other: {} items)", rest.len()),
                size,
                kind: BucketKind::Other,
            });
            buckets.sort_by(|a, b| b.size.cmp(&a.size));
            buckets
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, size: u64) -> FileFact {
        FileFact {
            path: PathBuf::from("/r").join(name),
            name: CompactString::new(name),
            size,
            modified: None,
        }
    }

    fn total(buckets: &[Bucket]) -> u64 {
        buckets.iter().map(|b| b.size).sum()
    }

    fn labels(buckets: &[Bucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.label.as_str()).collect()
    }

    /// ```text
    /// r/            top.bin (1000)
    ///   a/          a.txt (100)
    ///     b/        b.txt (200)
    ///       c/      c.txt (300)
    ///   d/          d.txt (400)
    /// ```
    fn nested() -> (DirTree, Vec<FileFact>) {
        let mut tree = DirTree::with_capacity(5);
        let r = tree.add_root(PathBuf::from("/r"));
        tree.add_file(r, 1_000);
        let a = tree.add_dir(r, PathBuf::from("/r/a"), "a");
        tree.add_file(a, 100);
        let b = tree.add_dir(a, PathBuf::from("/r/a/b"), "b");
        tree.add_file(b, 200);
        let c = tree.add_dir(b, PathBuf::from("/r/a/b/c"), "c");
        tree.add_file(c, 300);
        let d = tree.add_dir(r, PathBuf::from("/r/d"), "d");
        tree.add_file(d, 400);
        tree.finalize();
        (tree, vec![file("top.bin", 1_000)])
    }

    #[test]
    fn every_depth_conserves_the_root_total() {
        let (tree, root_files) = nested();
        let root_total = tree.root().unwrap().size;
        assert_eq!(root_total, 2_000);
        for level in 0..=4 {
            let buckets = bucketize_tree(&tree, &root_files, GroupingDepth::from_level(level));
            assert_eq!(total(&buckets), root_total, "depth {level}");
        }
    }

    #[test]
    fn unbounded_gives_one_direct_bucket_per_directory() {
        let (tree, root_files) = nested();
        let buckets = bucketize_tree(&tree, &root_files, GroupingDepth::Unbounded);
        assert_eq!(
            labels(&buckets),
            vec!["top.bin", "d/·files", "a/b/c/·files", "a/b/·files", "a/·files"]
        );
        assert!(buckets[1..].iter().all(|b| b.kind == BucketKind::DirectFiles));
        assert_eq!(buckets[0].kind, BucketKind::File);
    }

    /// Depth 2: `a` is above the boundary (direct files only), `a/b` is the
    /// boundary (whole subtree, `c` included), `c` contributes nothing.
    #[test]
    fn exact_depth_groups_subtrees_without_double_counting() {
        let (tree, root_files) = nested();
        let buckets = bucketize_tree(&tree, &root_files, GroupingDepth::from_level(2));
        assert_eq!(
            labels(&buckets),
            vec!["top.bin", "a/b/", "d/·files", "a/·files"]
        );
        let ab = buckets.iter().find(|b| b.label == "a/b/").unwrap();
        assert_eq!(ab.size, 500);
        assert_eq!(ab.kind, BucketKind::Subtree);
        assert!(!buckets.iter().any(|b| b.label.starts_with("a/b/c")));
    }

    #[test]
    fn depth_one_groups_top_level_directories() {
        let (tree, root_files) = nested();
        let buckets = bucketize_tree(&tree, &root_files, GroupingDepth::from_level(1));
        assert_eq!(labels(&buckets), vec!["top.bin", "a/", "d/"]);
        assert_eq!(buckets[1].size, 600);
        assert_eq!(buckets[2].size, 400);
    }

    #[test]
    fn empty_directories_produce_no_buckets() {
        let mut tree = DirTree::with_capacity(2);
        let r = tree.add_root(PathBuf::from("/r"));
        tree.add_dir(r, PathBuf::from("/r/empty"), "empty");
        tree.finalize();
        assert!(bucketize_tree(&tree, &[], GroupingDepth::Unbounded).is_empty());
        assert!(bucketize_tree(&tree, &[], GroupingDepth::from_level(1)).is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut tree = DirTree::with_capacity(1);
        tree.add_root(PathBuf::from("/r"));
        tree.finalize();
        let files = vec![file("b", 5), file("a", 5), file("c", 9)];
        let buckets = bucketize_tree(&tree, &files, GroupingDepth::Unbounded);
        assert_eq!(labels(&buckets), vec!["c", "b", "a"]);
    }

    fn sized(sizes: &[u64]) -> Vec<Bucket> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| Bucket {
                label: format_compact!("b{i}"),
                size,
                kind: BucketKind::DirectFiles,
            })
            .collect()
    }

    #[test]
    fn truncate_drop_omits_the_tail() {
        let out = truncate(sized(&[50, 40, 30, 20]), 2, Overflow::Drop);
        assert_eq!(labels(&out), vec!["b0", "b1"]);
        assert_eq!(total(&out), 90);
    }

    #[test]
    fn truncate_merge_keeps_every_byte() {
        let out = truncate(sized(&[50, 40, 30, 20]), 3, Overflow::Merge);
        assert_eq!(out.len(), 3);
        assert_eq!(total(&out), 140);
        // Ties with the largest kept bucket stay behind it.
        assert_eq!(labels(&out), vec!["b0", "(other: 2 items)", "b1"]);
        assert_eq!(out[1].size, 50);
        assert_eq!(out[1].kind, BucketKind::Other);
    }

    #[test]
    fn truncate_edge_cases() {
        assert!(truncate(sized(&[1, 2]), 0, Overflow::Merge).is_empty());
        assert_eq!(truncate(sized(&[3, 2]), 5, Overflow::Drop).len(), 2);
        let one = truncate(sized(&[3, 2, 1]), 1, Overflow::Merge);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].size, 6);
    }
}
