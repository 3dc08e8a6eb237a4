//! WebSocket module for live dashboard updates
//!
//! Provides WebSocket endpoint at `/ws` for broadcasting metrics changes to
//! connected clients.
//!
//! ## Features
//! - `state_updated` messages carrying new events and fresh stats
//! - Sequence ID tracking for gap detection
//! - "Snapshot then Subscribe": clients can request the full document

pub mod events;
pub mod handler;
pub mod poller;
pub mod state;

pub use poller::run_poller;
pub use state::AppState;
