/// Streaming SHA-256 of file contents.
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 1024 * 1024;

/// Placeholder shown when a file cannot be hashed.
pub const UNREADABLE: &str = "<unreadable>";

/// Lower-case hex SHA-256 of the file at `path`, read in 1 MiB chunks.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// [`sha256_file`], with failures rendered as [`UNREADABLE`].
pub fn sha256_or_unreadable(path: &Path) -> String {
    sha256_file(path).unwrap_or_else(|err| {
        tracing::debug!("Cannot hash {}: {err}", path.display());
        UNREADABLE.to_string()
    })
}
