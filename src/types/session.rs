//! Orchestration session summaries

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::or_default;

use super::AgentEvent;

/// Rollup of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionSummary {
    #[serde(deserialize_with = "or_default")]
    pub session_id: String,
    #[serde(deserialize_with = "or_default")]
    pub started_at: String,
    #[serde(deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub agents_invoked: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub tickets_touched: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub total_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub successful_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub failed_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_cost_usd: f64,
    #[serde(deserialize_with = "or_default")]
    pub duration_seconds: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionSummary {
    pub fn new(session_id: impl Into<String>, started_at: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            started_at: started_at.into(),
            ..Default::default()
        }
    }

    /// Aggregate the events that belong to `session_id`.
    ///
    /// Agents and tickets are listed once each, sorted. The session spans from
    /// the earliest `started_at` to the latest `ended_at` seen.
    pub fn from_events<'a, I>(session_id: &str, events: I) -> Self
    where
        I: IntoIterator<Item = &'a AgentEvent>,
    {
        let mut summary = SessionSummary::new(session_id, "");
        let mut agents = BTreeSet::new();
        let mut tickets = BTreeSet::new();
        let mut ended_at: Option<String> = None;

        for event in events.into_iter().filter(|e| e.session_id == session_id) {
            agents.insert(event.agent_name.clone());
            if let Some(ticket) = &event.ticket_key {
                tickets.insert(ticket.clone());
            }

            summary.total_invocations += 1;
            if event.status.is_success() {
                summary.successful_invocations += 1;
            } else {
                summary.failed_invocations += 1;
            }
            summary.total_tokens += event.total_tokens;
            summary.total_cost_usd += event.estimated_cost_usd;
            summary.duration_seconds += event.duration_seconds;

            // ISO-8601 UTC strings order lexicographically
            if summary.started_at.is_empty() || event.started_at < summary.started_at {
                summary.started_at = event.started_at.clone();
            }
            if ended_at.as_deref().map_or(true, |end| event.ended_at.as_str() > end) {
                ended_at = Some(event.ended_at.clone());
            }
        }

        summary.agents_invoked = agents.into_iter().collect();
        summary.tickets_touched = tickets.into_iter().collect();
        summary.ended_at = ended_at;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventStatus;

    fn event(agent: &str, session: &str, status: EventStatus, start: &str, end: &str) -> AgentEvent {
        AgentEvent {
            event_id: AgentEvent::generate_id(),
            agent_name: agent.to_string(),
            session_id: session.to_string(),
            started_at: start.to_string(),
            ended_at: end.to_string(),
            status,
            ..Default::default()
        }
        .with_tokens(100, 50)
        .with_cost(0.02)
        .with_duration(3.0)
    }

    #[test]
    fn test_from_events_aggregates_one_session() {
        let events = vec![
            event("coding", "s1", EventStatus::Success, "2026-01-01T10:00:00Z", "2026-01-01T10:01:00Z")
                .with_ticket("PROJ-1"),
            event("review", "s1", EventStatus::Error, "2026-01-01T09:59:00Z", "2026-01-01T10:05:00Z")
                .with_ticket("PROJ-1"),
            event("coding", "s1", EventStatus::Success, "2026-01-01T10:02:00Z", "2026-01-01T10:03:00Z")
                .with_ticket("PROJ-2"),
            event("coding", "other", EventStatus::Success, "2026-01-01T08:00:00Z", "2026-01-01T12:00:00Z"),
        ];

        let summary = SessionSummary::from_events("s1", &events);

        assert_eq!(summary.total_invocations, 3);
        assert_eq!(summary.successful_invocations, 2);
        assert_eq!(summary.failed_invocations, 1);
        assert_eq!(summary.total_tokens, 450);
        assert_eq!(summary.agents_invoked, vec!["coding", "review"]);
        assert_eq!(summary.tickets_touched, vec!["PROJ-1", "PROJ-2"]);
        assert_eq!(summary.started_at, "2026-01-01T09:59:00Z");
        assert_eq!(summary.ended_at.as_deref(), Some("2026-01-01T10:05:00Z"));
        assert!((summary.total_cost_usd - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_from_events_empty_session() {
        let summary = SessionSummary::from_events("none", &[]);
        assert_eq!(summary.total_invocations, 0);
        assert!(summary.ended_at.is_none());
    }
}
