//! Load-path recovery chain
//!
//! Each tier reports *why* it failed as a tagged [`LoadFailure`] so the chain
//! can be tested step by step. Only `MetricsStore::load` collapses an
//! [`Unrecoverable`] outcome into a fresh empty state.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use super::error::SchemaError;
use super::schema;
use crate::types::DashboardState;

/// Why a single file could not provide a state
#[derive(Debug)]
pub enum LoadFailure {
    Missing,
    Io(io::Error),
    /// Not JSON, including truncated files
    Parse(serde_json::Error),
    Schema(SchemaError),
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadFailure::Missing => write!(f, "file not found"),
            LoadFailure::Io(e) => write!(f, "read failed: {}", e),
            LoadFailure::Parse(e) => write!(f, "not valid JSON: {}", e),
            LoadFailure::Schema(e) => write!(f, "invalid document: {}", e),
        }
    }
}

impl LoadFailure {
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadFailure::Missing)
    }
}

/// Which file a recovered state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    Primary,
    Backup,
}

/// A state read from disk
#[derive(Debug)]
pub struct Recovered {
    pub state: DashboardState,
    pub source: StateSource,
    /// Set when the backup was used: why the primary was rejected
    pub primary_failure: Option<LoadFailure>,
}

/// Neither file held a usable state
#[derive(Debug)]
pub struct Unrecoverable {
    pub primary: LoadFailure,
    pub backup: LoadFailure,
}

impl Unrecoverable {
    /// True when there simply is no data yet, as opposed to broken data
    pub fn nothing_on_disk(&self) -> bool {
        self.primary.is_missing() && self.backup.is_missing()
    }
}

/// Read, parse and validate one file
pub fn read_state(path: &Path) -> Result<DashboardState, LoadFailure> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadFailure::Missing),
        Err(e) => return Err(LoadFailure::Io(e)),
    };
    parse_state(&bytes)
}

/// Parse and validate raw document bytes
pub fn parse_state(bytes: &[u8]) -> Result<DashboardState, LoadFailure> {
    let value: Value = serde_json::from_slice(bytes).map_err(LoadFailure::Parse)?;
    schema::validate(value).map_err(LoadFailure::Schema)
}

/// Try the primary file, then the backup
pub fn recover(primary: &Path, backup: &Path) -> Result<Recovered, Unrecoverable> {
    let primary_failure = match read_state(primary) {
        Ok(state) => {
            return Ok(Recovered {
                state,
                source: StateSource::Primary,
                primary_failure: None,
            })
        }
        Err(failure) => failure,
    };

    match read_state(backup) {
        Ok(state) => Ok(Recovered {
            state,
            source: StateSource::Backup,
            primary_failure: Some(primary_failure),
        }),
        Err(backup_failure) => Err(Unrecoverable {
            primary: primary_failure,
            backup: backup_failure,
        }),
    }
}
