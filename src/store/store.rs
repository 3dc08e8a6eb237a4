//! MetricsStore - crash-safe persistence of the dashboard document
//!
//! One store instance owns one project's files. All calls on an instance are
//! serialized by an in-process mutex; writes additionally hold the advisory
//! file lock so that saves from different processes never interleave.

use std::fs;
use std::io;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::StoreConfig;
use super::error::{StoreError, StoreResult};
use super::eviction::apply_eviction;
use super::lock::{self, AdvisoryLock, FileLock, NoopLock};
use super::recovery::{self, Recovered, StateSource, Unrecoverable};
use super::schema;
use crate::types::{DashboardState, StoreStats};
use crate::utils::{atomic_write, cleanup_stale_temp_files, next_timestamp};

/// Persistent store for a single project's DashboardState
pub struct MetricsStore {
    config: StoreConfig,
    /// Serializes load/save/update on this instance
    guard: Mutex<()>,
    file_lock: Box<dyn AdvisoryLock>,
}

impl MetricsStore {
    /// Open a store with the configured locking strategy
    pub fn new(config: StoreConfig) -> Self {
        let file_lock: Box<dyn AdvisoryLock> = if config.use_file_lock {
            Box::new(FileLock::new(config.lock_path()))
        } else {
            Box::new(NoopLock)
        };
        Self::with_lock(config, file_lock)
    }

    /// Open a store with a custom advisory lock
    pub fn with_lock(config: StoreConfig, file_lock: Box<dyn AdvisoryLock>) -> Self {
        Self {
            config,
            guard: Mutex::new(()),
            file_lock,
        }
    }

    /// Open a store configured from the environment
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Best available state. Never fails.
    ///
    /// Primary file, then backup, then a fresh empty state. Corruption is
    /// reported through the log only.
    pub fn load(&self) -> DashboardState {
        let _guard = self.guard.lock();
        self.load_unlocked()
    }

    /// Like [`load`](Self::load), but persists the fresh state when nothing
    /// usable exists on disk. I/O errors from that write are surfaced.
    pub fn load_or_init(&self) -> StoreResult<DashboardState> {
        let _guard = self.guard.lock();
        match self.recover() {
            Ok(recovered) => Ok(recovered.state),
            Err(_) => {
                let _file_lock = self.acquire_file_lock()?;
                // Another process may have initialized it while we waited
                match self.recover() {
                    Ok(recovered) => Ok(recovered.state),
                    Err(_) => {
                        let fresh = DashboardState::new(self.config.project_name.clone());
                        self.save_locked(fresh)
                    }
                }
            }
        }
    }

    /// Validate, evict, stamp and durably write `state`.
    ///
    /// Returns the document as written. Fails with [`StoreError::Schema`] on
    /// an invalid document (the file is left unchanged) and with
    /// [`StoreError::LockTimeout`] when another writer holds the lock too long.
    pub fn save(&self, state: &DashboardState) -> StoreResult<DashboardState> {
        let _guard = self.guard.lock();
        self.save_unlocked(state.clone())
    }

    /// Validate and save an untyped JSON document
    pub fn save_document(&self, document: Value) -> StoreResult<DashboardState> {
        let state = schema::validate(document)?;
        self.save(&state)
    }

    /// Read-modify-write under both locks.
    ///
    /// Unlike a `load()`/`save()` pair, no other writer can slip in between
    /// the read and the write, so concurrent updates are never lost.
    pub fn update<F>(&self, mutate: F) -> StoreResult<DashboardState>
    where
        F: FnOnce(&mut DashboardState),
    {
        let _guard = self.guard.lock();
        let _file_lock = self.acquire_file_lock()?;
        let mut state = self.load_unlocked();
        mutate(&mut state);
        self.save_locked(state)
    }

    /// Size and record counts of the on-disk document
    pub fn get_stats(&self) -> StoreStats {
        let state = self.load();

        StoreStats {
            file_size_bytes: self.file_size_bytes(),
            event_count: state.events.len(),
            session_count: state.sessions.len(),
            agent_count: state.agents.len(),
        }
    }

    /// Size of the primary file, 0 when it does not exist
    pub fn file_size_bytes(&self) -> u64 {
        fs::metadata(self.config.primary_path())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    fn recover(&self) -> Result<Recovered, Unrecoverable> {
        recovery::recover(&self.config.primary_path(), &self.config.backup_path())
    }

    fn load_unlocked(&self) -> DashboardState {
        match self.recover() {
            Ok(Recovered {
                state,
                source: StateSource::Primary,
                ..
            }) => state,
            Ok(Recovered {
                state,
                primary_failure,
                ..
            }) => {
                warn!(
                    path = %self.config.primary_path().display(),
                    reason = %primary_failure.map(|f| f.to_string()).unwrap_or_default(),
                    "primary metrics file unusable, recovered from backup"
                );
                state
            }
            Err(unrecoverable) => {
                if unrecoverable.nothing_on_disk() {
                    debug!(dir = %self.config.data_dir().display(), "no metrics file yet, starting empty");
                } else {
                    warn!(
                        primary = %unrecoverable.primary,
                        backup = %unrecoverable.backup,
                        "metrics files unusable, starting from an empty state"
                    );
                }
                DashboardState::new(self.config.project_name.clone())
            }
        }
    }

    fn acquire_file_lock(&self) -> StoreResult<lock::LockGuard<'_>> {
        lock::acquire(
            self.file_lock.as_ref(),
            self.config.lock_timeout,
            self.config.lock_poll_interval,
        )
    }

    fn save_unlocked(&self, state: DashboardState) -> StoreResult<DashboardState> {
        // Reject before waiting on the lock
        schema::validate_state(&state)?;
        let _file_lock = self.acquire_file_lock()?;
        self.save_locked(state)
    }

    /// Write path. Caller holds both locks.
    fn save_locked(&self, mut state: DashboardState) -> StoreResult<DashboardState> {
        schema::validate_state(&state)?;

        let report = apply_eviction(&mut state, &self.config.retention);
        if !report.is_noop() {
            debug!(
                events_dropped = report.events_dropped,
                sessions_dropped = report.sessions_dropped,
                "evicted oldest records"
            );
        }
        state.updated_at = next_timestamp(&state.updated_at);

        let bytes = serde_json::to_vec_pretty(&state)?;
        let primary = self.config.primary_path();

        if self.config.use_file_lock {
            match cleanup_stale_temp_files(&primary, self.config.stale_temp_age) {
                Ok(0) => {}
                Ok(n) => info!(count = n, "removed temp files left by interrupted writes"),
                Err(e) => warn!(error = %e, "failed to clean up stale temp files"),
            }
        }

        self.backup_previous()?;
        atomic_write(&primary, &bytes)?;

        debug!(
            path = %primary.display(),
            bytes = bytes.len(),
            events = state.events.len(),
            sessions = state.sessions.len(),
            "saved metrics"
        );
        Ok(state)
    }

    /// Copy the current primary to the backup if it is a good document.
    ///
    /// A corrupt primary is not copied, so the backup keeps the last good
    /// state.
    fn backup_previous(&self) -> StoreResult<()> {
        let primary = self.config.primary_path();
        let bytes = match fs::read(&primary) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        match recovery::parse_state(&bytes) {
            Ok(_) => {
                atomic_write(self.config.backup_path(), &bytes)?;
                Ok(())
            }
            Err(failure) => {
                warn!(
                    path = %primary.display(),
                    reason = %failure,
                    "not backing up unusable primary file"
                );
                Ok(())
            }
        }
    }
}
