//! Store poller
//!
//! The store has no change notifications (writers may live in other
//! processes), so the server re-reads it on a fixed cadence and broadcasts a
//! `state_updated` message whenever `updated_at` moves.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::events::DashboardEvent;
use super::state::AppState;
use crate::types::{AgentEvent, DashboardState, StoreStats};

/// Upper bound on events carried by one update message
pub const MAX_EVENTS_PER_UPDATE: usize = 100;

/// Remembers what the last broadcast covered
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last_updated_at: Option<String>,
    last_event_id: Option<String>,
}

impl ChangeTracker {
    /// Start tracking from `state` without reporting it as a change
    pub fn baseline(state: &DashboardState) -> Self {
        Self {
            last_updated_at: Some(state.updated_at.clone()),
            last_event_id: state.events.last().map(|e| e.event_id.clone()),
        }
    }

    /// Events appended since the last observation, or `None` if unchanged
    pub fn observe(&mut self, state: &DashboardState) -> Option<Vec<AgentEvent>> {
        if self.last_updated_at.as_deref() == Some(state.updated_at.as_str()) {
            return None;
        }

        let start = self
            .last_event_id
            .as_ref()
            .and_then(|id| state.events.iter().rposition(|e| &e.event_id == id))
            .map(|pos| pos + 1)
            // Last seen event was evicted (or never existed): send the tail
            .unwrap_or(0);
        let fresh = &state.events[start..];
        let skip = fresh.len().saturating_sub(MAX_EVENTS_PER_UPDATE);

        self.last_updated_at = Some(state.updated_at.clone());
        self.last_event_id = state.events.last().map(|e| e.event_id.clone());
        Some(fresh[skip..].to_vec())
    }
}

/// Poll the store forever, broadcasting changes
pub async fn run_poller(state: Arc<AppState>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let initial = state.load_state().await;
    let mut tracker = ChangeTracker::baseline(&initial);

    loop {
        ticker.tick().await;

        let (doc, file_size_bytes) = state.load_state_with_size().await;
        let Some(new_events) = tracker.observe(&doc) else {
            continue;
        };

        let stats = StoreStats {
            file_size_bytes,
            event_count: doc.events.len(),
            session_count: doc.sessions.len(),
            agent_count: doc.agents.len(),
        };
        debug!(new_events = new_events.len(), "metrics changed, broadcasting");
        state.broadcast(DashboardEvent::StateUpdated {
            updated_at: doc.updated_at.clone(),
            stats,
            new_events,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(ids: &[&str], updated_at: &str) -> DashboardState {
        let mut state = DashboardState::new("demo");
        state.updated_at = updated_at.to_string();
        state.events = ids
            .iter()
            .map(|id| AgentEvent {
                event_id: id.to_string(),
                ..Default::default()
            })
            .collect();
        state
    }

    #[test]
    fn test_unchanged_state_reports_nothing() {
        let state = state_with(&["a"], "t1");
        let mut tracker = ChangeTracker::baseline(&state);
        assert!(tracker.observe(&state).is_none());
    }

    #[test]
    fn test_reports_only_new_events() {
        let mut tracker = ChangeTracker::baseline(&state_with(&["a", "b"], "t1"));

        let fresh = tracker.observe(&state_with(&["a", "b", "c", "d"], "t2")).unwrap();
        let ids: Vec<_> = fresh.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);

        let fresh = tracker.observe(&state_with(&["a", "b", "c", "d", "e"], "t3")).unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].event_id, "e");
    }

    #[test]
    fn test_update_without_new_events() {
        let mut tracker = ChangeTracker::baseline(&state_with(&["a"], "t1"));
        let fresh = tracker.observe(&state_with(&["a"], "t2")).unwrap();
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_evicted_marker_sends_bounded_tail() {
        let mut tracker = ChangeTracker::baseline(&state_with(&["gone"], "t1"));
        let ids: Vec<String> = (0..150).map(|i| format!("e{}", i)).collect();
        let refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();

        let fresh = tracker.observe(&state_with(&refs, "t2")).unwrap();
        assert_eq!(fresh.len(), MAX_EVENTS_PER_UPDATE);
        assert_eq!(fresh[0].event_id, "e50");
    }
}
