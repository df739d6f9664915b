/// Sequential post-order aggregation over a directory tree.
///
/// `jwalk` drives the traversal in serial mode with name-sorted listings, so
/// a given tree always yields the same visit order. Entries arrive
/// parent-first; directories are appended to the [`DirTree`] arena as they
/// appear and files are folded straight into their parent's direct totals.
/// Once the walk ends, [`DirTree::finalize`] rolls the arena up in reverse,
/// which finalizes every directory only after all of its descendants.
///
/// Exclusions (hidden names, ignore globs, unfollowed symlinks) are applied
/// in jwalk's `process_read_dir` hook, which removes the entry from the
/// listing before jwalk can descend into it.
use super::options::{ScanOptions, TraversalPolicy};
use super::progress::{ProgressUpdate, ScanObserver};
use super::result::{ScanResult, ScanWarning};
use crate::analysis::{ExtensionHistogram, TopFiles};
use crate::error::ScanError;
use crate::model::{DirTree, FileFact};
use chrono::Utc;
use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of entries between two observer callbacks.
pub const PROGRESS_INTERVAL: u64 = 1_000;

/// Global state threaded through one walk.
///
/// Everything the walk learns beyond per-directory totals lands here
/// instead of in ambient shared state, so the walk stays a function from
/// (tree on disk, options) to (stats, warnings).
pub struct ScanAccumulator {
    extensions: ExtensionHistogram,
    largest: TopFiles,
    root_files: Vec<FileFact>,
    warnings: Vec<ScanWarning>,
    files_found: u64,
    dirs_found: u64,
    bytes_found: u64,
}

impl ScanAccumulator {
    pub fn new(largest_n: usize) -> Self {
        Self {
            extensions: ExtensionHistogram::new(),
            largest: TopFiles::new(largest_n),
            root_files: Vec::new(),
            warnings: Vec::new(),
            files_found: 0,
            dirs_found: 1, // the root
            bytes_found: 0,
        }
    }

    fn record_file(&mut self, fact: FileFact, in_root: bool) {
        self.extensions.record(&fact.name, fact.size);
        self.files_found += 1;
        self.bytes_found += fact.size;
        if in_root {
            self.root_files.push(fact.clone());
        }
        self.largest.offer(fact);
    }

    fn record_dir(&mut self) {
        self.dirs_found += 1;
    }

    fn warn(&mut self, warning: ScanWarning, observer: &mut dyn ScanObserver) {
        warn!("{warning}");
        observer.on_warning(&warning);
        self.warnings.push(warning);
    }

    fn progress(&self, current: &Path) -> ProgressUpdate {
        ProgressUpdate {
            files_found: self.files_found,
            dirs_found: self.dirs_found,
            total_size: self.bytes_found,
            current_path: current.to_string_lossy().into_owned(),
        }
    }
}

/// What a walked entry turned out to be.
enum EntryKind {
    Dir,
    File(fs::Metadata),
    Other,
}

/// Scan `root` and aggregate statistics, keeping the `largest_n` biggest
/// files.
///
/// Fails only if the root is missing, not a directory, or unlistable, or if
/// an ignore pattern is malformed. Anything unreadable further down becomes
/// a [`ScanWarning`] on the result.
pub fn aggregate(
    root: &Path,
    options: &ScanOptions,
    largest_n: usize,
) -> Result<ScanResult, ScanError> {
    aggregate_observed(root, options, largest_n, &mut ())
}

/// [`aggregate`] with progress callbacks and cooperative cancellation.
pub fn aggregate_observed(
    root: &Path,
    options: &ScanOptions,
    largest_n: usize,
    observer: &mut dyn ScanObserver,
) -> Result<ScanResult, ScanError> {
    check_root(root)?;
    let policy = options.policy(root)?;

    let started_at = Utc::now();
    let start = Instant::now();
    info!("Starting scan of {}", root.display());

    let mut tree = DirTree::with_capacity(1_024);
    let root_idx = tree.add_root(root.to_path_buf());
    let mut acc = ScanAccumulator::new(largest_n);
    let mut visited: u64 = 0;

    for entry_result in walker(&policy) {
        visited += 1;

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                // Directories already in the tree failed to list; anything
                // else (dangling links, loops) failed to resolve.
                let message = match tree.lookup(&path) {
                    Some(idx) => {
                        tree.mark_error(idx);
                        format!("failed to list directory: {err}")
                    }
                    None => format!("failed to read entry: {err}"),
                };
                acc.warn(ScanWarning::new(path, message), observer);
                continue;
            }
        };

        let path = entry.path();

        // Skip the root itself (already created).
        if path == root {
            continue;
        }

        if visited % PROGRESS_INTERVAL == 0
            && observer.on_progress(&acc.progress(&path)).is_break()
        {
            info!("Scan of {} cancelled after {visited} entries", root.display());
            return Err(ScanError::Cancelled);
        }

        let Some(parent_idx) = path.parent().and_then(|p| tree.lookup(p)) else {
            // Only possible when the parent itself was dropped.
            debug!("No parent directory recorded for {}", path.display());
            continue;
        };

        let is_symlink = entry.path_is_symlink() || entry.file_type().is_symlink();
        let name = entry.file_name().to_string_lossy().into_owned();

        match classify(&entry.file_type(), &path, is_symlink) {
            Ok(EntryKind::Dir) => {
                tree.add_dir(parent_idx, path, &name);
                acc.record_dir();
            }
            Ok(EntryKind::File(meta)) => {
                let size = meta.len();
                tree.add_file(parent_idx, size);
                let fact = FileFact {
                    path,
                    name: CompactString::new(&name),
                    size,
                    modified: meta.modified().ok(),
                };
                acc.record_file(fact, parent_idx == root_idx);
            }
            // Sockets, FIFOs, device nodes.
            Ok(EntryKind::Other) => {}
            Err(err) => {
                acc.warn(
                    ScanWarning::new(path, format!("failed to inspect entry: {err}")),
                    observer,
                );
            }
        }
    }

    debug!(
        "Walk complete: {} files, {} dirs in {:?}. Running aggregation...",
        acc.files_found,
        acc.dirs_found,
        start.elapsed()
    );
    tree.finalize();
    debug_assert_eq!(
        tree.root().map_or(0, |r| r.size),
        acc.bytes_found,
        "rolled-up root size must equal the bytes seen by the walk"
    );

    let elapsed = start.elapsed();
    info!(
        "Scan of {} finished: {} files, {} dirs, {} bytes, {} warnings in {elapsed:?}",
        root.display(),
        acc.files_found,
        acc.dirs_found,
        acc.bytes_found,
        acc.warnings.len()
    );

    Ok(ScanResult {
        root: root.to_path_buf(),
        started_at,
        finished_at: Utc::now(),
        elapsed,
        tree,
        extensions: acc.extensions.into_sorted(),
        largest_files: acc.largest.into_sorted(),
        root_files: acc.root_files,
        warnings: acc.warnings,
    })
}

/// Fatal preconditions: the root must exist, be a directory, and be listable.
fn check_root(root: &Path) -> Result<(), ScanError> {
    let meta = fs::metadata(root).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        _ => ScanError::Unreadable {
            path: root.to_path_buf(),
            source,
        },
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Configure jwalk for a deterministic single-threaded walk.
fn walker(policy: &TraversalPolicy) -> WalkDir {
    let filter = policy.clone();
    WalkDir::new(policy.root())
        .sort(true)
        .skip_hidden(false)
        .follow_links(policy.follow_symlinks())
        .parallelism(Parallelism::Serial)
        .process_read_dir(move |_depth, _dir, _state, children| {
            children.retain(|child| match child {
                Ok(entry) => !filter.skips(
                    &entry.path(),
                    &entry.file_name().to_string_lossy(),
                    entry.path_is_symlink() || entry.file_type().is_symlink(),
                ),
                // Keep errors so they surface as warnings.
                Err(_) => true,
            });
        })
}

/// Resolve an entry to directory, regular file, or something else. Followed
/// symlinks are resolved to their target.
fn classify(file_type: &fs::FileType, path: &Path, is_symlink: bool) -> io::Result<EntryKind> {
    if is_symlink {
        let meta = fs::metadata(path)?;
        return Ok(if meta.is_dir() {
            EntryKind::Dir
        } else if meta.is_file() {
            EntryKind::File(meta)
        } else {
            EntryKind::Other
        });
    }
    if file_type.is_dir() {
        Ok(EntryKind::Dir)
    } else if file_type.is_file() {
        fs::symlink_metadata(path).map(EntryKind::File)
    } else {
        Ok(EntryKind::Other)
    }
}
