//! Store configuration

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default directory (relative to the working directory) holding the files
pub const DEFAULT_DATA_DIR: &str = ".agent-metrics";
pub const PRIMARY_FILE_NAME: &str = "dashboard.json";
pub const BACKUP_FILE_NAME: &str = "dashboard.json.bak";
pub const LOCK_FILE_NAME: &str = "dashboard.lock";

/// FIFO caps on the unbounded lists of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionLimits {
    pub max_events: usize,
    pub max_sessions: usize,
}

impl Default for RetentionLimits {
    fn default() -> Self {
        Self {
            max_events: 500,
            max_sessions: 50,
        }
    }
}

/// Configuration for a MetricsStore
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the primary, backup and lock files
    pub data_dir: PathBuf,
    /// Project name stamped into freshly created documents
    pub project_name: String,
    pub retention: RetentionLimits,
    /// Maximum wait for the cross-process write lock
    pub lock_timeout: Duration,
    pub lock_poll_interval: Duration,
    /// Take the advisory file lock around writes
    pub use_file_lock: bool,
    /// Temp files older than this are treated as crash leftovers
    pub stale_temp_age: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            project_name: default_project_name(),
            retention: RetentionLimits::default(),
            lock_timeout: Duration::from_secs(5),
            lock_poll_interval: Duration::from_millis(50),
            use_file_lock: true,
            stale_temp_age: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Build config from the environment.
    ///
    /// - `AGENT_METRICS_DIR`: data directory (relative paths resolve against
    ///   the working directory)
    /// - `AGENT_METRICS_PROJECT`: project name
    /// - `AGENT_METRICS_LOCK_TIMEOUT_MS`: write lock timeout
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        config.data_dir = match env::var("AGENT_METRICS_DIR") {
            Ok(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
            Ok(path) => current_dir.join(path),
            Err(_) => current_dir.join(DEFAULT_DATA_DIR),
        };

        if let Ok(name) = env::var("AGENT_METRICS_PROJECT") {
            if !name.trim().is_empty() {
                config.project_name = name;
            }
        }

        if let Ok(ms) = env::var("AGENT_METRICS_LOCK_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.lock_timeout = Duration::from_millis(ms);
            }
        }

        config
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_retention(mut self, retention: RetentionLimits) -> Self {
        self.retention = retention;
        self
    }

    pub fn without_file_lock(mut self) -> Self {
        self.use_file_lock = false;
        self
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to the primary metrics document
    pub fn primary_path(&self) -> PathBuf {
        self.data_dir.join(PRIMARY_FILE_NAME)
    }

    /// Get path to the previous good document
    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(BACKUP_FILE_NAME)
    }

    /// Get path to the advisory lock file
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE_NAME)
    }
}

/// Name of the working directory, or `default`
fn default_project_name() -> String {
    env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "default".to_string())
}
