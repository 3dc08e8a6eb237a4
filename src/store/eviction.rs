//! FIFO retention for the event and session logs
//!
//! Agent profiles are never evicted; only the raw logs are pruned.

use super::config::RetentionLimits;
use crate::types::DashboardState;

/// What an eviction pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    pub events_dropped: usize,
    pub sessions_dropped: usize,
}

impl EvictionReport {
    pub fn is_noop(&self) -> bool {
        self.events_dropped == 0 && self.sessions_dropped == 0
    }
}

/// Drop items from the front until at most `cap` remain.
///
/// Returns the number of items removed. Relative order of the survivors is
/// preserved.
pub fn evict_oldest<T>(items: &mut Vec<T>, cap: usize) -> usize {
    let excess = items.len().saturating_sub(cap);
    if excess > 0 {
        items.drain(..excess);
    }
    excess
}

/// Bound `events` and `sessions` to the configured caps, oldest first
pub fn apply_eviction(state: &mut DashboardState, limits: &RetentionLimits) -> EvictionReport {
    EvictionReport {
        events_dropped: evict_oldest(&mut state.events, limits.max_events),
        sessions_dropped: evict_oldest(&mut state.sessions, limits.max_sessions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentEvent, AgentProfile, SessionSummary};

    fn state_with(events: usize, sessions: usize) -> DashboardState {
        let mut state = DashboardState::new("demo");
        for i in 0..events {
            state.events.push(AgentEvent {
                event_id: format!("e{}", i),
                ..Default::default()
            });
        }
        for i in 0..sessions {
            state.sessions.push(SessionSummary::new(format!("s{}", i), ""));
        }
        state
    }

    #[test]
    fn test_evict_oldest_keeps_tail_in_order() {
        let mut items: Vec<u32> = (0..10).collect();
        let dropped = evict_oldest(&mut items, 4);
        assert_eq!(dropped, 6);
        assert_eq!(items, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_evict_under_cap_is_noop() {
        let mut items = vec![1, 2, 3];
        assert_eq!(evict_oldest(&mut items, 3), 0);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_eviction_caps_both_logs() {
        let mut state = state_with(600, 70);
        let report = apply_eviction(&mut state, &RetentionLimits::default());

        assert_eq!(report.events_dropped, 100);
        assert_eq!(report.sessions_dropped, 20);
        assert_eq!(state.events.len(), 500);
        assert_eq!(state.sessions.len(), 50);
        assert_eq!(state.events[0].event_id, "e100");
        assert_eq!(state.events[499].event_id, "e599");
        assert_eq!(state.sessions[0].session_id, "s20");
    }

    #[test]
    fn test_apply_eviction_is_idempotent() {
        let mut state = state_with(600, 0);
        apply_eviction(&mut state, &RetentionLimits::default());
        let snapshot = state.clone();

        let report = apply_eviction(&mut state, &RetentionLimits::default());
        assert!(report.is_noop());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_agents_never_evicted() {
        let mut state = state_with(10, 0);
        for i in 0..100 {
            let name = format!("agent-{}", i);
            state.agents.insert(name.clone(), AgentProfile::new(name));
        }
        let limits = RetentionLimits {
            max_events: 1,
            max_sessions: 1,
        };
        apply_eviction(&mut state, &limits);
        assert_eq!(state.agents.len(), 100);
        assert_eq!(state.events.len(), 1);
    }
}
