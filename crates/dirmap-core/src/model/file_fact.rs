/// A file seen during the walk.
use compact_str::CompactString;
use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFact {
    /// Full path as walked.
    pub path: PathBuf,
    /// File name only.
    pub name: CompactString,
    /// Logical size in bytes.
    pub size: u64,
    /// Last-modified timestamp, when the platform reports one.
    pub modified: Option<SystemTime>,
}
