/// Text tree view of a scanned directory.
///
/// Directories are re-listed from disk under the same [`TraversalPolicy`] the
/// scan used, so the tree shows individual files without the scan having to
/// keep them. Recursive totals for directories come from the scan's
/// [`DirTree`].
use dirmap_core::model::size::format_size;
use dirmap_core::model::{DepthLimit, DirTree};
use dirmap_core::scanner::TraversalPolicy;
use std::fs;
use std::path::{Path, PathBuf};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

pub const TRUNCATION_NOTE: &str = "… (tree truncated: reached max entries)";
pub const UNREADABLE_DIR: &str = "[unreadable]";

struct Child {
    path: PathBuf,
    name: String,
    /// `None` when the size could not be read.
    size: Option<u64>,
    is_dir: bool,
}

struct TreeBuilder<'a> {
    tree: &'a DirTree,
    policy: &'a TraversalPolicy,
    depth: DepthLimit,
    max_entries: usize,
    emitted: usize,
    lines: Vec<String>,
}

/// Render the tree rooted at `policy.root()`.
///
/// The header line is not counted against `max_entries`; once the cap is
/// reached no further lines are emitted and [`TRUNCATION_NOTE`] is appended.
pub fn tree_lines(
    tree: &DirTree,
    policy: &TraversalPolicy,
    depth: DepthLimit,
    max_entries: usize,
) -> Vec<String> {
    let root = policy.root();
    let mut builder = TreeBuilder {
        tree,
        policy,
        depth,
        max_entries,
        emitted: 0,
        lines: Vec::new(),
    };
    builder.lines.push(builder.dir_label(root, &display_name(root)));
    builder.walk(root, "", 0);
    if builder.emitted >= max_entries {
        builder.lines.push(TRUNCATION_NOTE.to_string());
    }
    builder.lines
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl TreeBuilder<'_> {
    fn dir_label(&self, path: &Path, name: &str) -> String {
        match self.tree.get(path) {
            Some(stat) => format!(
                "{name}/  ({}, {} files, {} dirs)",
                format_size(stat.size),
                stat.file_count,
                stat.dir_count
            ),
            None => format!("{name}/"),
        }
    }

    fn walk(&mut self, dir: &Path, prefix: &str, level: usize) {
        if self.emitted >= self.max_entries {
            return;
        }
        let children = match self.list(dir) {
            Ok(children) => children,
            Err(err) => {
                tracing::debug!("Tree view cannot list {}: {err}", dir.display());
                self.lines.push(format!("{prefix}{UNREADABLE_DIR}"));
                self.emitted += 1;
                return;
            }
        };

        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            if self.emitted >= self.max_entries {
                return;
            }
            let last = i + 1 == count;
            let branch = if last { LAST_BRANCH } else { BRANCH };
            let next_prefix = format!("{prefix}{}", if last { SPACE } else { PIPE });

            if child.is_dir {
                let label = self.dir_label(&child.path, &child.name);
                self.lines.push(format!("{prefix}{branch}{label}"));
                self.emitted += 1;
                if self.depth.allows_descent_below(level) {
                    self.walk(&child.path, &next_prefix, level + 1);
                }
            } else {
                let size = child
                    .size
                    .map_or_else(|| "<unreadable>".to_string(), format_size);
                self.lines
                    .push(format!("{prefix}{branch}{}  ({size})", child.name));
                self.emitted += 1;
            }
        }
    }

    /// Directories first by recursive size, then files by size, both
    /// descending; ties fall back to name order.
    fn list(&self, dir: &Path) -> std::io::Result<Vec<Child>> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else { continue };
            if self.policy.skips(&path, &name, file_type.is_symlink()) {
                continue;
            }
            let meta = if file_type.is_symlink() {
                fs::metadata(&path)
            } else {
                entry.metadata()
            };
            let Ok(meta) = meta else { continue };
            if meta.is_dir() {
                let size = self.tree.get(&path).map(|s| s.size);
                dirs.push(Child {
                    path,
                    name,
                    size,
                    is_dir: true,
                });
            } else if meta.is_file() {
                files.push(Child {
                    path,
                    name,
                    size: Some(meta.len()),
                    is_dir: false,
                });
            }
        }
        for group in [&mut dirs, &mut files] {
            group.sort_by(|a, b| a.name.cmp(&b.name));
            group.sort_by(|a, b| b.size.unwrap_or(0).cmp(&a.size.unwrap_or(0)));
        }
        dirs.append(&mut files);
        Ok(dirs)
    }
}
