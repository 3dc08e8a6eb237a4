//! Agent invocation events

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::lenient::or_default;

use crate::utils::time::now_iso8601;

/// Outcome of a single agent invocation
///
/// Serialized as a lowercase string. A status this build does not know is
/// kept verbatim in `Other` so that rewriting the document leaves it intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventStatus {
    #[default]
    Success,
    Error,
    Timeout,
    Blocked,
    Other(String),
}

impl EventStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EventStatus::Success => "success",
            EventStatus::Error => "error",
            EventStatus::Timeout => "timeout",
            EventStatus::Blocked => "blocked",
            EventStatus::Other(status) => status,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == EventStatus::Success
    }
}

impl From<&str> for EventStatus {
    fn from(status: &str) -> Self {
        match status {
            "success" => EventStatus::Success,
            "error" => EventStatus::Error,
            "timeout" => EventStatus::Timeout,
            "blocked" => EventStatus::Blocked,
            other => EventStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for EventStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = String::deserialize(deserializer)?;
        Ok(EventStatus::from(status.as_str()))
    }
}

/// One record of a single agent invocation outcome.
///
/// Events are immutable once written. Unknown fields from newer producers
/// are kept in `extra` so that rewriting the document does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentEvent {
    #[serde(deserialize_with = "or_default")]
    pub event_id: String,
    #[serde(deserialize_with = "or_default")]
    pub agent_name: String,
    #[serde(deserialize_with = "or_default")]
    pub session_id: String,
    #[serde(deserialize_with = "or_default")]
    pub ticket_key: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub started_at: String,
    #[serde(deserialize_with = "or_default")]
    pub ended_at: String,
    #[serde(deserialize_with = "or_default")]
    pub duration_seconds: f64,
    #[serde(deserialize_with = "or_default")]
    pub status: EventStatus,
    #[serde(deserialize_with = "or_default")]
    pub input_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub output_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub estimated_cost_usd: f64,
    #[serde(deserialize_with = "or_default")]
    pub artifacts: Vec<String>,
    #[serde(deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub model_used: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentEvent {
    /// Create an event stamped with a fresh id and the current time
    pub fn new(agent_name: impl Into<String>, session_id: impl Into<String>, status: EventStatus) -> Self {
        let now = now_iso8601();
        Self {
            event_id: Self::generate_id(),
            agent_name: agent_name.into(),
            session_id: session_id.into(),
            started_at: now.clone(),
            ended_at: now,
            status,
            ..Default::default()
        }
    }

    /// Random event id
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn with_tokens(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self.total_tokens = input_tokens + output_tokens;
        self
    }

    pub fn with_cost(mut self, estimated_cost_usd: f64) -> Self {
        self.estimated_cost_usd = estimated_cost_usd;
        self
    }

    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_ticket(mut self, ticket_key: impl Into<String>) -> Self {
        self.ticket_key = Some(ticket_key.into());
        self
    }

    pub fn with_model(mut self, model_used: impl Into<String>) -> Self {
        self.model_used = model_used.into();
        self
    }

    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_lowercase() {
        let value = serde_json::to_value(EventStatus::Timeout).unwrap();
        assert_eq!(value, json!("timeout"));
    }

    #[test]
    fn test_foreign_status_is_kept_verbatim() {
        let status: EventStatus = serde_json::from_value(json!("cancelled")).unwrap();
        assert_eq!(status, EventStatus::Other("cancelled".to_string()));
        assert!(!status.is_success());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("cancelled"));
    }

    #[test]
    fn test_ill_typed_fields_fall_back_to_defaults() {
        let event: AgentEvent = serde_json::from_value(json!({
            "event_id": "e2",
            "agent_name": "coding",
            "ended_at": null,
            "model_used": null,
            "input_tokens": "lots",
            "status": 3
        }))
        .unwrap();
        assert_eq!(event.event_id, "e2");
        assert_eq!(event.ended_at, "");
        assert_eq!(event.model_used, "");
        assert_eq!(event.input_tokens, 0);
        assert_eq!(event.status, EventStatus::Success);
    }

    #[test]
    fn test_missing_fields_default() {
        let event: AgentEvent =
            serde_json::from_value(json!({"event_id": "e1", "agent_name": "coding"})).unwrap();
        assert_eq!(event.event_id, "e1");
        assert_eq!(event.status, EventStatus::Success);
        assert_eq!(event.total_tokens, 0);
        assert!(event.artifacts.is_empty());
    }

    #[test]
    fn test_extra_fields_survive_rewrite() {
        let event: AgentEvent = serde_json::from_value(json!({
            "event_id": "e1",
            "agent_name": "review",
            "retries": 2
        }))
        .unwrap();
        assert_eq!(event.extra.get("retries"), Some(&json!(2)));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["retries"], json!(2));
    }

    #[test]
    fn test_builder_sums_tokens() {
        let event = AgentEvent::new("coding", "s1", EventStatus::Success).with_tokens(300, 200);
        assert_eq!(event.total_tokens, 500);
        assert_eq!(event.event_id.len(), 32);
    }
}
