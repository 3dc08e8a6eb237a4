//! Agent Metrics
//!
//! A crash-safe JSON metrics store behind an agent dashboard. Orchestrators
//! record agent invocations and sessions; dashboards read the document back,
//! from the CLI or over HTTP and WebSocket.
//!
//! # Guarantees
//!
//! - **Atomic writes**: the document is replaced via temp file + rename, so a
//!   reader never sees a half-written file
//! - **Backup & recovery**: the last good document is kept as `.bak`; loading
//!   falls back to it, then to a fresh empty state
//! - **Bounded size**: events and sessions are evicted oldest-first on save
//! - **Cross-process safety**: writes hold an advisory file lock
//!
//! # Modules
//!
//! - `types`: Document data structures (DashboardState, AgentEvent, ...)
//! - `store`: Persistence, validation, eviction, locking and recovery
//! - `collector`: Folding events and sessions into the document
//! - `leaderboard`: Agent ranking
//! - `api`: REST and WebSocket dashboard server
//! - `cli`: Command line parsing and text views
//! - `utils`: Atomic file writes and timestamps
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_metrics::{AgentEvent, EventStatus, MetricsCollector, MetricsStore, StoreConfig};
//!
//! fn main() -> Result<(), agent_metrics::StoreError> {
//!     let store = Arc::new(MetricsStore::new(StoreConfig::new(".agent-metrics")));
//!     let collector = MetricsCollector::new(store.clone());
//!     collector.record_event(
//!         AgentEvent::new("coding", "session-1", EventStatus::Success).with_tokens(1200, 800),
//!     )?;
//!     println!("{} events", store.load().events.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collector;
pub mod leaderboard;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use collector::MetricsCollector;
pub use store::{MetricsStore, SchemaError, StoreConfig, StoreError, StoreResult};
pub use types::{AgentEvent, AgentProfile, DashboardState, EventStatus, SessionSummary, StoreStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
