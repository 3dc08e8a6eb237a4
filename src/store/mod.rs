//! Metrics Store Module
//!
//! Crash-safe persistence of the per-project DashboardState:
//! - `schema`: structural validation of the document
//! - `eviction`: FIFO caps on events (500) and sessions (50)
//! - `recovery`: primary → backup → empty fallback chain
//! - `lock`: advisory cross-process write lock
//! - `MetricsStore`: ties them together behind `load` / `save` / `update`
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌─────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌──────────────┐
//! │ save()  │──►│ validate │──►│ file lock  │──►│ evict +   │──►│ backup prev, │
//! │         │   │          │   │ (timeout)  │   │ stamp     │   │ tmp + rename │
//! └─────────┘   └──────────┘   └────────────┘   └───────────┘   └──────────────┘
//!
//! Read Path:
//! ┌────────────────┐  fail  ┌─────────────┐  fail  ┌─────────────┐
//! │ dashboard.json │───────►│ .json.bak   │───────►│ empty state │
//! └────────────────┘        └─────────────┘        └─────────────┘
//! ```

mod config;
mod error;
pub mod eviction;
pub mod lock;
pub mod recovery;
pub mod schema;
mod store;

pub use config::{
    RetentionLimits, StoreConfig, BACKUP_FILE_NAME, DEFAULT_DATA_DIR, LOCK_FILE_NAME, PRIMARY_FILE_NAME,
};
pub use error::{SchemaError, StoreError, StoreResult};
pub use eviction::{apply_eviction, EvictionReport};
pub use lock::{AdvisoryLock, FileLock, NoopLock};
pub use recovery::{LoadFailure, Recovered, StateSource, Unrecoverable};
pub use store::MetricsStore;
