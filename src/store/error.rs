//! Store error types

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::utils::AtomicError;

/// Result type for MetricsStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A document that does not have the required shape.
///
/// Returned by `save()` for caller bugs, and swallowed by `load()`'s
/// recovery chain for on-disk documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{collection}` entry {key} must be a JSON object, found {found}")]
    NotAMapping {
        collection: &'static str,
        key: String,
        found: &'static str,
    },

    #[error("unsupported schema version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("field `{field}` must be a finite number")]
    NonFiniteNumber { field: String },

    #[error("document does not decode: {0}")]
    Decode(String),
}

/// Errors surfaced by MetricsStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// Saving a structurally invalid document (caller bug)
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    /// The cross-process write lock was not acquired in time
    #[error("timed out after {waited:?} waiting for write lock {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AtomicError> for StoreError {
    fn from(e: AtomicError) -> Self {
        StoreError::Io(e.into())
    }
}

impl StoreError {
    pub fn is_schema(&self) -> bool {
        matches!(self, StoreError::Schema(_))
    }

    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, StoreError::LockTimeout { .. })
    }
}
