//! Atomic file operations
//!
//! This module provides utilities for atomic file writes to prevent
//! data corruption during crashes or power failures.
//!
//! # Pattern
//!
//! 1. Write to a uniquely named temp file in the target's directory
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on the same filesystem)
//! 4. Sync the directory so the rename itself is durable
//!
//! This ensures that the final file is either:
//! - The old version (if crash before rename)
//! - The new version (if rename completed)
//! - Never a partial/corrupted state

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::debug;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to move temp file into place at {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

impl From<AtomicError> for io::Error {
    fn from(e: AtomicError) -> Self {
        match e {
            AtomicError::Io(e) => e,
            AtomicError::Persist { source, .. } => source,
        }
    }
}

/// Temp file name prefix for `path`, e.g. `.dashboard.json.`
pub fn temp_prefix(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{}.", name)
}

const TEMP_SUFFIX: &str = ".tmp";

/// Atomically write content to a file
///
/// # Example
///
/// ```ignore
/// atomic_write("data/dashboard.json", b"{}")?;
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> AtomicResult<()> {
    atomic_write_with(path, |file| file.write_all(content))
}

/// Atomically write content using a writer function
///
/// If `write_fn` or the sync fails, the temp file is removed and the
/// destination is left untouched.
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let path = path.as_ref();
    let dir = parent_dir(path);

    // Ensure parent directory exists
    fs::create_dir_all(&dir)?;

    // Dropping a NamedTempFile before persist() deletes it
    let mut temp: NamedTempFile = Builder::new()
        .prefix(&temp_prefix(path))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&dir)?;

    write_fn(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| AtomicError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    sync_dir(&dir);
    debug!(path = %path.display(), "atomically replaced file");
    Ok(())
}

/// Clean up temp files left behind by interrupted writes to `path`.
///
/// Only files matching this path's temp prefix and older than `min_age` are
/// removed, so a writer that is mid-flight keeps its file.
pub fn cleanup_stale_temp_files<P: AsRef<Path>>(path: P, min_age: Duration) -> AtomicResult<usize> {
    let path = path.as_ref();
    let dir = parent_dir(path);
    let prefix = temp_prefix(path);
    let mut cleaned = 0;

    if !dir.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(&prefix) || !name.ends_with(TEMP_SUFFIX) {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age < min_age {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => cleaned += 1,
            // Another process got there first
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(cleaned)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        atomic_write(&path, b"{\"a\":1}").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"a\":1}");

        // Temp file should not exist
        assert!(temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_leaves_target_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        atomic_write(&path, b"previous").unwrap();

        let result = atomic_write_with(&path, |file| {
            file.write_all(b"{\"half\":")?;
            Err(io::Error::new(io::ErrorKind::Other, "simulated crash"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
        assert!(temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("subdir").join("nested").join("test.json");

        atomic_write(&path, b"nested content").unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "nested content");
    }

    #[test]
    fn test_cleanup_stale_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.json");

        fs::write(temp_dir.path().join(".dashboard.json.abc123.tmp"), "partial").unwrap();
        fs::write(temp_dir.path().join(".other.json.abc123.tmp"), "keep").unwrap();
        fs::write(&path, "{}").unwrap();

        let cleaned = cleanup_stale_temp_files(&path, Duration::ZERO).unwrap();
        assert_eq!(cleaned, 1);

        assert!(!temp_dir.path().join(".dashboard.json.abc123.tmp").exists());
        assert!(temp_dir.path().join(".other.json.abc123.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn test_cleanup_skips_fresh_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.json");
        fs::write(temp_dir.path().join(".dashboard.json.inflight.tmp"), "partial").unwrap();

        let cleaned = cleanup_stale_temp_files(&path, Duration::from_secs(3600)).unwrap();
        assert_eq!(cleaned, 0);
    }
}
