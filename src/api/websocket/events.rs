//! WebSocket message types for live dashboard updates

use serde::{Deserialize, Serialize};

use crate::types::{AgentEvent, DashboardState, StoreStats};

/// Dashboard events broadcast to WebSocket clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// The metrics document was saved since the last poll
    StateUpdated {
        updated_at: String,
        stats: StoreStats,
        /// Events appended since the previous broadcast, oldest first
        new_events: Vec<AgentEvent>,
    },
}

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsMessage {
    #[serde(flatten)]
    pub event: DashboardEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when the message was created
    pub timestamp: i64,
}

/// Client message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the full current document
    Snapshot,

    /// Ping for heartbeat
    Ping,
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub current_sequence_id: u64,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
        }
    }
}

/// Full document sent in reply to a `snapshot` request
#[derive(Clone, Debug, Serialize)]
pub struct SnapshotMessage<'a> {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub sequence_id: u64,
    pub state: &'a DashboardState,
}

impl<'a> SnapshotMessage<'a> {
    pub fn new(sequence_id: u64, state: &'a DashboardState) -> Self {
        Self {
            msg_type: "snapshot",
            sequence_id,
            state,
        }
    }
}

/// Pong response message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Default for PongMessage {
    fn default() -> Self {
        Self {
            msg_type: "pong".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_message_serialization() {
        let msg = WsMessage {
            event: DashboardEvent::StateUpdated {
                updated_at: "2026-01-01T00:00:00.000000Z".to_string(),
                stats: StoreStats::default(),
                new_events: vec![],
            },
            sequence_id: 42,
            timestamp: 1234567890,
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "state_updated");
        assert_eq!(json["sequence_id"], 42);
        assert_eq!(json["stats"]["event_count"], 0);
    }

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"snapshot"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Snapshot));
    }
}
