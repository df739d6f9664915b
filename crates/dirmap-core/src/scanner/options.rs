/// Traversal options and the compiled policy the walker applies to every
/// entry.
use crate::error::ScanError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Patterns skipped when the caller does not supply any.
pub const DEFAULT_IGNORE_GLOBS: &[&str] = &[".git/**", "__pycache__/**", "*.pyc"];

/// Names starting with this character are treated as hidden.
pub const HIDDEN_MARKER: char = '.';

/// Options controlling what the walk counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOptions {
    /// Treat symbolic links as their target instead of skipping them.
    pub follow_symlinks: bool,
    /// Count names starting with [`HIDDEN_MARKER`].
    pub include_hidden: bool,
    /// Shell globs matched against the `/`-separated path relative to the
    /// root. Matching entries are skipped entirely.
    pub ignore_globs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            ignore_globs: DEFAULT_IGNORE_GLOBS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    /// Split a `;`-separated pattern list, dropping blanks.
    pub fn parse_globs(list: &str) -> Vec<String> {
        list.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Compile these options into a policy for a walk rooted at `root`.
    pub fn policy(&self, root: &Path) -> Result<TraversalPolicy, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_globs {
            // Default glob semantics let `*` cross `/`, like fnmatch.
            let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| ScanError::InvalidGlob {
            pattern: self.ignore_globs.join(";"),
            source,
        })?;

        Ok(TraversalPolicy {
            root: root.to_path_buf(),
            follow_symlinks: self.follow_symlinks,
            include_hidden: self.include_hidden,
            ignore,
        })
    }
}

/// Compiled form of [`ScanOptions`] for one root.
#[derive(Debug, Clone)]
pub struct TraversalPolicy {
    root: PathBuf,
    follow_symlinks: bool,
    include_hidden: bool,
    ignore: GlobSet,
}

impl TraversalPolicy {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// `true` when an entry must be skipped entirely: not counted and, for
    /// directories, not descended into.
    pub fn skips(&self, path: &Path, name: &str, is_symlink: bool) -> bool {
        if is_symlink && !self.follow_symlinks {
            return true;
        }
        if !self.include_hidden && name.starts_with(HIDDEN_MARKER) {
            return true;
        }
        !self.ignore.is_empty() && self.ignore.is_match(self.relative_posix(path))
    }

    /// `path` relative to the root with `/` separators. Paths outside the
    /// root are returned whole.
    pub fn relative_posix(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let mut out = String::new();
        for component in rel.components() {
            let part = match component {
                Component::Normal(s) => s.to_string_lossy(),
                Component::RootDir => {
                    out.push('/');
                    continue;
                }
                other => other.as_os_str().to_string_lossy(),
            };
            if !out.is_empty() && !out.ends_with('/') {
                out.push('/');
            }
            out.push_str(&part);
        }
        out
    }
}
