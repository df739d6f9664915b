/// Fatal scan errors.
///
/// Only conditions that prevent the walk from starting (or stop it as a
/// whole) live here. Unreadable entries *inside* the tree are not errors:
/// they are collected as [`ScanWarning`](crate::scanner::ScanWarning)s on the
/// result and the walk carries on.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The requested root does not exist.
    #[error("root directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The requested root exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The root exists but cannot be stat'ed or listed at all.
    #[error("cannot read root directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An exclude pattern is not a valid shell glob.
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The caller asked the walk to stop.
    #[error("scan cancelled")]
    Cancelled,

    /// The background scan thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Failures while serializing a finished scan.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export write failed: {0}")]
    Io(#[from] std::io::Error),
}
