//! The root persisted document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AgentEvent, AgentProfile, SessionSummary};
use crate::utils::time::now_iso8601;

/// Schema version written by this build
pub const CURRENT_VERSION: u64 = 1;

/// The single JSON document persisted per project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub version: u64,
    pub project_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub total_sessions: u64,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
    pub total_duration_seconds: f64,
    pub agents: BTreeMap<String, AgentProfile>,
    pub events: Vec<AgentEvent>,
    pub sessions: Vec<SessionSummary>,
}

impl DashboardState {
    /// Fresh empty state: zero counters, empty collections
    pub fn new(project_name: impl Into<String>) -> Self {
        let now = now_iso8601();
        Self {
            version: CURRENT_VERSION,
            project_name: project_name.into(),
            created_at: now.clone(),
            updated_at: now,
            total_sessions: 0,
            total_tokens: 0,
            total_cost_usd: 0.0,
            total_duration_seconds: 0.0,
            agents: BTreeMap::new(),
            events: Vec::new(),
            sessions: Vec::new(),
        }
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sessions.is_empty() && self.agents.is_empty()
    }

    /// Most recent events first, at most `limit`
    pub fn recent_events(&self, limit: usize) -> impl Iterator<Item = &AgentEvent> {
        self.events.iter().rev().take(limit)
    }

    /// Events recorded for one agent, oldest first
    pub fn events_for<'a>(&'a self, agent_name: &'a str) -> impl Iterator<Item = &'a AgentEvent> + 'a {
        self.events.iter().filter(move |e| e.agent_name == agent_name)
    }
}

/// Read-only introspection of a store's on-disk document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub file_size_bytes: u64,
    pub event_count: usize,
    pub session_count: usize,
    pub agent_count: usize,
}

impl StoreStats {
    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zeroed() {
        let state = DashboardState::new("demo");
        assert_eq!(state.version, CURRENT_VERSION);
        assert_eq!(state.total_sessions, 0);
        assert_eq!(state.total_tokens, 0);
        assert!(state.is_empty());
        assert_eq!(state.created_at, state.updated_at);
    }

    #[test]
    fn test_recent_events_newest_first() {
        let mut state = DashboardState::new("demo");
        for i in 0..5 {
            let mut event = AgentEvent::default();
            event.event_id = format!("e{}", i);
            state.events.push(event);
        }
        let ids: Vec<_> = state.recent_events(2).map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["e4", "e3"]);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(StoreStats::format_size(500), "500 B");
        assert_eq!(StoreStats::format_size(1536), "1.50 KB");
        assert_eq!(StoreStats::format_size(1048576), "1.00 MB");
    }
}
