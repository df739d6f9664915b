/// End-to-end scanner integration tests.
///
/// These run the real `aggregate` and `start_scan` code paths against a
/// temporary filesystem and check the totals, bucket conservation and the
/// progress channel protocol. No mocking: jwalk sees real directories.
use dirmap_core::scanner::{
    aggregate, aggregate_observed, start_scan, ProgressUpdate, ScanObserver, ScanOptions,
    ScanProgress, PROGRESS_INTERVAL,
};
use dirmap_core::treemap::{bucketize, squarify, BucketKind, GroupingDepth, Rect};
use dirmap_core::ScanError;
use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

fn no_ignores() -> ScanOptions {
    ScanOptions {
        ignore_globs: Vec::new(),
        ..ScanOptions::default()
    }
}

/// ```text
/// root/
///   A/
///     x (100)
///     sub/
///       y (300)
///   B/
///     z (600)
/// ```
fn build_nested(root: &Path) {
    fs::create_dir_all(root.join("A/sub")).unwrap();
    fs::create_dir_all(root.join("B")).unwrap();
    write_bytes(&root.join("A/x"), 100);
    write_bytes(&root.join("A/sub/y"), 300);
    write_bytes(&root.join("B/z"), 600);
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn flat_directory_totals_and_buckets() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a"), 100);
    write_bytes(&tmp.path().join("b"), 200);
    write_bytes(&tmp.path().join("c"), 300);

    let scan = aggregate(tmp.path(), &no_ignores(), 10).unwrap();
    assert_eq!(scan.total_size(), 600);
    assert_eq!(scan.total_files(), 3);
    assert_eq!(scan.total_dirs(), 0);
    assert!(!scan.is_incomplete());

    let buckets = bucketize(&scan, GroupingDepth::Unbounded);
    let summary: Vec<(&str, u64)> = buckets.iter().map(|b| (b.label.as_str(), b.size)).collect();
    assert_eq!(summary, vec![("c", 300), ("b", 200), ("a", 100)]);
    assert!(buckets.iter().all(|b| b.kind == BucketKind::File));
}

#[test]
fn nested_depth_one_groups_whole_subtrees() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());

    let scan = aggregate(tmp.path(), &no_ignores(), 10).unwrap();
    let buckets = bucketize(&scan, GroupingDepth::from_level(1));
    let summary: Vec<(&str, u64)> = buckets.iter().map(|b| (b.label.as_str(), b.size)).collect();
    assert_eq!(summary, vec![("B/", 600), ("A/", 400)]);

    let a = scan.tree.get(&tmp.path().join("A")).unwrap();
    assert_eq!(a.size, 400);
    assert_eq!(a.direct_size, 100);
    assert_eq!(a.file_count, 2);
    assert_eq!(a.dir_count, 1);
    assert_eq!(a.rel_path, "A");
    assert_eq!(scan.tree.get(&tmp.path().join("A/sub")).unwrap().rel_path, "A/sub");
}

#[test]
fn directory_size_is_direct_plus_children() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());
    write_bytes(&tmp.path().join("top.bin"), 7);

    let scan = aggregate(tmp.path(), &no_ignores(), 10).unwrap();
    assert_eq!(scan.total_size(), 1_007);
    for (idx, stat) in scan.tree.iter() {
        let children: u64 = scan
            .tree
            .children(idx)
            .into_iter()
            .map(|c| scan.tree.stat(c).size)
            .sum();
        assert_eq!(stat.size, stat.direct_size + children, "{}", stat.path.display());
    }
}

#[test]
fn buckets_conserve_bytes_at_every_depth() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());
    write_bytes(&tmp.path().join("top.bin"), 7);

    let scan = aggregate(tmp.path(), &no_ignores(), 10).unwrap();
    for level in 0..=3 {
        let buckets = bucketize(&scan, GroupingDepth::from_level(level));
        let total: u64 = buckets.iter().map(|b| b.size).sum();
        assert_eq!(total, scan.total_size(), "depth {level}");

        let weights: Vec<f64> = buckets.iter().map(|b| b.size as f64).collect();
        let cells = squarify(&weights, Rect::new(0.0, 0.0, 1400.0, 900.0));
        assert_eq!(cells.len(), buckets.len());
    }
}

#[test]
fn hidden_entries_and_ignore_globs_are_excluded() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    fs::create_dir_all(root.join("build")).unwrap();
    write_bytes(&root.join(".git/objects/pack"), 5_000);
    write_bytes(&root.join(".env"), 50);
    write_bytes(&root.join("build/out.o"), 700);
    write_bytes(&root.join("keep.rs"), 10);
    write_bytes(&root.join("cache.pyc"), 40);

    let options = ScanOptions {
        ignore_globs: vec!["build/**".into(), "build".into(), "*.pyc".into()],
        ..ScanOptions::default()
    };
    let scan = aggregate(root, &options, 10).unwrap();
    assert_eq!(scan.total_size(), 10);
    assert_eq!(scan.total_files(), 1);
    assert!(scan.tree.get(&root.join(".git")).is_none());
    assert!(scan.tree.get(&root.join("build")).is_none());

    let with_hidden = ScanOptions {
        include_hidden: true,
        ignore_globs: Vec::new(),
        ..ScanOptions::default()
    };
    let scan = aggregate(root, &with_hidden, 10).unwrap();
    assert_eq!(scan.total_size(), 5_000 + 50 + 700 + 10 + 40);
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = aggregate(&tmp.path().join("nope"), &no_ignores(), 10).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
}

#[test]
fn file_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    write_bytes(&file, 3);
    let err = aggregate(&file, &no_ignores(), 10).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

#[test]
fn empty_root_has_no_buckets() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("empty")).unwrap();
    let scan = aggregate(tmp.path(), &no_ignores(), 10).unwrap();
    assert_eq!(scan.total_size(), 0);
    assert_eq!(scan.total_dirs(), 1);
    assert!(bucketize(&scan, GroupingDepth::Unbounded).is_empty());
}

#[test]
fn largest_files_and_extensions_are_ranked() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());
    write_bytes(&tmp.path().join("notes.TXT"), 250);

    let scan = aggregate(tmp.path(), &no_ignores(), 2).unwrap();
    let top: Vec<(&str, u64)> = scan
        .largest_files
        .iter()
        .map(|f| (f.name.as_str(), f.size))
        .collect();
    assert_eq!(top, vec![("z", 600), ("y", 300)]);

    let txt = scan
        .extensions
        .iter()
        .find(|e| e.extension == ".txt")
        .unwrap();
    assert_eq!((txt.bytes, txt.files), (250, 1));
    let bare = scan
        .extensions
        .iter()
        .find(|e| e.extension == dirmap_core::analysis::NO_EXTENSION)
        .unwrap();
    assert_eq!((bare.bytes, bare.files), (1_000, 3));

    assert_eq!(scan.root_files.len(), 1);
    assert_eq!(scan.root_files[0].name, "notes.TXT");
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped_unless_followed() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    let outside = tmp.path().join("outside");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&outside).unwrap();
    write_bytes(&outside.join("big"), 1_000);
    write_bytes(&root.join("real"), 10);
    std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

    let scan = aggregate(&root, &no_ignores(), 10).unwrap();
    assert_eq!(scan.total_size(), 10);

    let follow = ScanOptions {
        follow_symlinks: true,
        ..no_ignores()
    };
    let scan = aggregate(&root, &follow, 10).unwrap();
    assert_eq!(scan.total_size(), 1_010);
}

#[cfg(unix)]
#[test]
fn unreadable_links_become_warnings_and_stay_out_of_totals() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("r");
    fs::create_dir_all(root.join("sub")).unwrap();
    write_bytes(&root.join("sub/a"), 10);
    std::os::unix::fs::symlink(root.join("missing"), root.join("sub/dangling")).unwrap();
    std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();

    let follow = ScanOptions {
        follow_symlinks: true,
        ..no_ignores()
    };
    let scan = aggregate(&root, &follow, 10).unwrap();

    assert!(scan.is_incomplete());
    assert_eq!(scan.warnings.len(), 2);
    let dangling = scan
        .warnings
        .iter()
        .find(|w| w.path.ends_with("sub/dangling"))
        .expect("warning for the dangling link");
    assert!(dangling.message.starts_with("failed to read entry"));
    assert!(scan.warnings.iter().any(|w| w.path.ends_with("sub/loop")));

    assert_eq!(scan.total_size(), 10);
    assert_eq!(scan.total_files(), 1);
    assert_eq!(scan.total_dirs(), 1);

    for level in 0..=2 {
        let buckets = bucketize(&scan, GroupingDepth::from_level(level));
        let sum: u64 = buckets.iter().map(|b| b.size).sum();
        assert_eq!(sum, 10, "bucket sum at depth {level}");
    }
}

// ── Background worker ────────────────────────────────────────────────────────

#[test]
fn start_scan_delivers_complete_result() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf(), no_ignores(), 5).unwrap();
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Complete { result, .. }) => {
                assert_eq!(result.total_size(), 1_000);
                assert_eq!(result.total_files(), 3);
                break;
            }
            Ok(ScanProgress::Failed(msg)) => panic!("scan failed: {msg}"),
            Ok(ScanProgress::Cancelled) => panic!("scan was unexpectedly cancelled"),
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Complete was sent");
            }
        }
    }
}

#[test]
fn wait_returns_the_result() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf(), no_ignores(), 5).unwrap();
    let result = handle.wait(|_| {}).expect("scan should complete");
    assert_eq!(result.total_size(), 1_000);
}

#[test]
fn failed_root_is_reported_on_the_channel() {
    let tmp = TempDir::new().unwrap();
    let handle = start_scan(tmp.path().join("missing"), no_ignores(), 5).unwrap();
    let mut failure = None;
    let result = handle.wait(|message| {
        if let ScanProgress::Failed(msg) = message {
            failure = Some(msg.clone());
        }
    });
    assert!(result.is_none());
    assert!(failure.unwrap().contains("not found"));
}

/// Stops the walk at the first checkpoint and counts what it saw.
struct StopAtFirstCheckpoint {
    updates: usize,
}

impl ScanObserver for StopAtFirstCheckpoint {
    fn on_progress(&mut self, update: &ProgressUpdate) -> ControlFlow<()> {
        self.updates += 1;
        assert!(update.files_found > 0);
        ControlFlow::Break(())
    }
}

#[test]
fn observer_break_cancels_the_walk() {
    let tmp = TempDir::new().unwrap();
    // Enough entries to reach at least one checkpoint.
    for i in 0..(PROGRESS_INTERVAL + 10) {
        write_bytes(&tmp.path().join(format!("f{i:05}")), 1);
    }
    let mut observer = StopAtFirstCheckpoint { updates: 0 };
    let err = aggregate_observed(tmp.path(), &no_ignores(), 5, &mut observer).unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
    assert_eq!(observer.updates, 1);
}

#[test]
fn cancel_flag_is_visible_on_the_handle() {
    let tmp = TempDir::new().unwrap();
    let handle = start_scan(tmp.path().to_path_buf(), no_ignores(), 5).unwrap();
    assert!(!handle.is_cancelled());
    handle.cancel();
    assert!(handle.is_cancelled());
    // An empty tree may finish before the flag is polled; either way the
    // channel ends with a terminal message.
    let _ = handle.wait(|_| {});
}
