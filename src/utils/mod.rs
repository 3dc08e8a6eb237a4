//! Utility functions and helpers
//!
//! This module contains atomic file writes and timestamp utilities.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, atomic_write_with, cleanup_stale_temp_files, AtomicError, AtomicResult};
pub use time::{format_timestamp, humanize_since, next_timestamp, now_iso8601, parse_timestamp};
