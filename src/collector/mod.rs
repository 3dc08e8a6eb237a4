//! Metrics collector - the instrumentation side of the dashboard
//!
//! Orchestrators report each agent invocation and each finished session here.
//! The collector appends the raw records and keeps the agent profiles and
//! project totals in step, all inside a single `MetricsStore::update` so that
//! collectors running in several processes never lose each other's records.
//!
//! XP, levels, achievements and streaks are carried on the profile but are
//! not computed here.

use std::sync::Arc;

use tracing::debug;

use crate::store::{MetricsStore, StoreResult};
use crate::types::{AgentEvent, AgentProfile, DashboardState, SessionSummary};
use crate::utils::now_iso8601;

/// Number of event ids remembered per profile
pub const RECENT_EVENT_IDS: usize = 10;

/// Records agent events and sessions into a shared store
#[derive(Clone)]
pub struct MetricsCollector {
    store: Arc<MetricsStore>,
}

impl MetricsCollector {
    pub fn new(store: Arc<MetricsStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<MetricsStore> {
        &self.store
    }

    /// Append `event` and fold it into its agent's profile.
    ///
    /// Returns the agent's profile as persisted.
    pub fn record_event(&self, event: AgentEvent) -> StoreResult<AgentProfile> {
        let agent_name = event.agent_name.clone();
        let event_id = event.event_id.clone();

        let state = self.store.update(|state| apply_event(state, event))?;

        debug!(agent = %agent_name, event_id = %event_id, "recorded agent event");
        Ok(state
            .agents
            .get(&agent_name)
            .cloned()
            .unwrap_or_else(|| AgentProfile::new(agent_name)))
    }

    /// Append a finished session and bump the session total
    pub fn record_session(&self, mut summary: SessionSummary) -> StoreResult<()> {
        if summary.ended_at.is_none() {
            summary.ended_at = Some(now_iso8601());
        }
        let session_id = summary.session_id.clone();

        self.store.update(|state| {
            state.sessions.push(summary);
            state.total_sessions += 1;
        })?;

        debug!(session_id = %session_id, "recorded session");
        Ok(())
    }

    /// Summarize the session from the events still retained and record it
    pub fn finish_session(&self, session_id: &str) -> StoreResult<SessionSummary> {
        let mut recorded = None;
        self.store.update(|state| {
            let mut summary = SessionSummary::from_events(session_id, &state.events);
            if summary.ended_at.is_none() {
                summary.ended_at = Some(now_iso8601());
            }
            state.sessions.push(summary.clone());
            state.total_sessions += 1;
            recorded = Some(summary);
        })?;
        Ok(recorded.unwrap_or_else(|| SessionSummary::new(session_id, now_iso8601())))
    }
}

/// Fold one event into the state: log, profile and project totals
pub fn apply_event(state: &mut DashboardState, event: AgentEvent) {
    let profile = state
        .agents
        .entry(event.agent_name.clone())
        .or_insert_with(|| AgentProfile::new(event.agent_name.clone()));

    profile.total_invocations += 1;
    if event.status.is_success() {
        profile.successful_invocations += 1;
    } else {
        profile.failed_invocations += 1;
        if let Some(message) = &event.error_message {
            profile.last_error = Some(message.clone());
        }
    }

    profile.total_input_tokens += event.input_tokens;
    profile.total_output_tokens += event.output_tokens;
    profile.total_tokens += event.total_tokens;
    profile.total_cost_usd += event.estimated_cost_usd;
    profile.total_duration_seconds += event.duration_seconds;
    for artifact in &event.artifacts {
        *profile.artifacts_produced.entry(artifact.clone()).or_insert(0) += 1;
    }
    profile.refresh_rates();

    profile.recent_event_ids.push(event.event_id.clone());
    crate::store::eviction::evict_oldest(&mut profile.recent_event_ids, RECENT_EVENT_IDS);
    profile.last_active = Some(if event.ended_at.is_empty() {
        now_iso8601()
    } else {
        event.ended_at.clone()
    });

    state.total_tokens += event.total_tokens;
    state.total_cost_usd += event.estimated_cost_usd;
    state.total_duration_seconds += event.duration_seconds;
    state.events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventStatus;

    #[test]
    fn test_apply_event_updates_profile_and_totals() {
        let mut state = DashboardState::new("demo");

        apply_event(
            &mut state,
            AgentEvent::new("coding", "s1", EventStatus::Success)
                .with_tokens(300, 200)
                .with_cost(0.01)
                .with_duration(4.0)
                .with_artifacts(vec!["commit".to_string(), "test".to_string()]),
        );
        apply_event(
            &mut state,
            AgentEvent::new("coding", "s1", EventStatus::Error)
                .with_tokens(50, 50)
                .with_error("compile failed"),
        );

        let profile = &state.agents["coding"];
        assert_eq!(profile.total_invocations, 2);
        assert_eq!(profile.successful_invocations, 1);
        assert_eq!(profile.failed_invocations, 1);
        assert_eq!(profile.total_tokens, 600);
        assert_eq!(profile.success_rate, 0.5);
        assert_eq!(profile.artifact_count(), 2);
        assert_eq!(profile.last_error.as_deref(), Some("compile failed"));
        assert_eq!(profile.recent_event_ids.len(), 2);

        assert_eq!(state.total_tokens, 600);
        assert_eq!(state.events.len(), 2);
    }

    #[test]
    fn test_recent_event_ids_are_bounded() {
        let mut state = DashboardState::new("demo");
        let mut last_id = String::new();
        for _ in 0..25 {
            let event = AgentEvent::new("qa", "s1", EventStatus::Success);
            last_id = event.event_id.clone();
            apply_event(&mut state, event);
        }

        let profile = &state.agents["qa"];
        assert_eq!(profile.recent_event_ids.len(), RECENT_EVENT_IDS);
        assert_eq!(profile.recent_event_ids.last(), Some(&last_id));
    }

    #[test]
    fn test_gamification_fields_untouched() {
        let mut state = DashboardState::new("demo");
        apply_event(&mut state, AgentEvent::new("coding", "s1", EventStatus::Success));

        let profile = &state.agents["coding"];
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert!(profile.achievements.is_empty());
        assert_eq!(profile.current_streak, 0);
    }
}
