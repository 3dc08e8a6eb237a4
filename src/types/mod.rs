//! Data types for the agent metrics dashboard
//!
//! This module contains the persisted document and its records.

mod agent_event;
pub(crate) mod lenient;
mod profile;
mod session;
mod state;

pub use agent_event::{AgentEvent, EventStatus};
pub use profile::AgentProfile;
pub use session::SessionSummary;
pub use state::{DashboardState, StoreStats, CURRENT_VERSION};
