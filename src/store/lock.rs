//! Cross-process advisory locking
//!
//! The store only needs try-acquire and release; [`acquire`] layers the
//! bounded wait on top and returns a guard that releases on drop.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::{StoreError, StoreResult};

/// A cooperative lock shared between processes
pub trait AdvisoryLock: Send + Sync {
    /// Take the lock without blocking. `Ok(false)` means someone else holds it.
    fn try_acquire(&self) -> io::Result<bool>;

    /// Give the lock back
    fn release(&self) -> io::Result<()>;

    /// What the lock protects, for error messages
    fn describe(&self) -> PathBuf;
}

/// Exclusive `flock`-style lock on a dedicated lock file
pub struct FileLock {
    path: PathBuf,
    held: Mutex<Option<File>>,
}

impl FileLock {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            held: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
    }
}

impl AdvisoryLock for FileLock {
    fn try_acquire(&self) -> io::Result<bool> {
        let mut held = self.held.lock();
        if held.is_some() {
            return Ok(false);
        }

        let file = self.open()?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                *held = Some(file);
                Ok(true)
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn release(&self) -> io::Result<()> {
        match self.held.lock().take() {
            // Closing the handle would release it too
            Some(file) => FileExt::unlock(&file),
            None => Ok(()),
        }
    }

    fn describe(&self) -> PathBuf {
        self.path.clone()
    }
}

/// Lock that always succeeds, for single-process deployments
#[derive(Debug, Default)]
pub struct NoopLock;

impl AdvisoryLock for NoopLock {
    fn try_acquire(&self) -> io::Result<bool> {
        Ok(true)
    }

    fn release(&self) -> io::Result<()> {
        Ok(())
    }

    fn describe(&self) -> PathBuf {
        PathBuf::from("<no lock>")
    }
}

/// A held lock. Unlocks on drop.
pub struct LockGuard<'a> {
    lock: &'a dyn AdvisoryLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            warn!(lock = %self.lock.describe().display(), error = %e, "failed to release write lock");
        }
    }
}

/// Acquire `lock`, polling every `poll` until `timeout` elapses
pub fn acquire(lock: &dyn AdvisoryLock, timeout: Duration, poll: Duration) -> StoreResult<LockGuard<'_>> {
    let start = Instant::now();
    loop {
        if lock.try_acquire()? {
            debug!(lock = %lock.describe().display(), waited = ?start.elapsed(), "acquired write lock");
            return Ok(LockGuard { lock });
        }

        let waited = start.elapsed();
        if waited >= timeout {
            return Err(StoreError::LockTimeout {
                path: lock.describe(),
                waited,
            });
        }

        thread::sleep(poll.min(timeout - waited));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let lock = FileLock::new(dir.path().join("test.lock"));

        {
            let _guard = acquire(&lock, Duration::from_millis(100), Duration::from_millis(10)).unwrap();
            assert!(lock.path().exists());
        }

        // Released on drop, so it can be taken again
        let _guard = acquire(&lock, Duration::from_millis(100), Duration::from_millis(10)).unwrap();
    }

    #[test]
    fn test_second_holder_times_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let first = FileLock::new(&path);
        let second = FileLock::new(&path);

        let _guard = acquire(&first, Duration::from_millis(100), Duration::from_millis(10)).unwrap();
        let err = acquire(&second, Duration::from_millis(120), Duration::from_millis(20))
            .err()
            .unwrap();

        match err {
            StoreError::LockTimeout { path: locked, waited } => {
                assert_eq!(locked, path);
                assert!(waited >= Duration::from_millis(120));
            }
            other => panic!("expected lock timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_waiter_gets_lock_after_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let first = std::sync::Arc::new(FileLock::new(&path));
        assert!(first.try_acquire().unwrap());

        let releaser = {
            let first = first.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                first.release().unwrap();
            })
        };

        let second = FileLock::new(&path);
        let guard = acquire(&second, Duration::from_secs(5), Duration::from_millis(10));
        assert!(guard.is_ok());
        releaser.join().unwrap();
    }

    #[test]
    fn test_noop_lock_always_succeeds() {
        let lock = NoopLock;
        let _a = acquire(&lock, Duration::ZERO, Duration::ZERO).unwrap();
        let _b = acquire(&lock, Duration::ZERO, Duration::ZERO).unwrap();
    }
}
