//! REST API module for HTTP endpoints
//!
//! Read-only views over the metrics document:
//! - `GET /api/state` - Full DashboardState
//! - `GET /api/stats` - Store introspection
//! - `GET /api/agents` - Ranked agent profiles
//! - `GET /api/agents/:name` - Single profile with its retained events
//! - `GET /api/events` - Event log, newest first, with pagination
//! - `GET /api/sessions` - Session summaries, newest first

pub mod agents;
pub mod dashboard;
pub mod events;

use serde::{Deserialize, Serialize};

/// Common pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items to return (default: 100, max: 500)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of items to skip
    #[serde(default)]
    pub offset: usize,
}

pub(crate) fn default_limit() -> usize {
    100
}

impl PaginationParams {
    /// Normalize limit to max 500, the event retention cap
    pub fn normalized_limit(&self) -> usize {
        self.limit.min(500)
    }
}

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current sequence ID, to line up with WebSocket updates
    pub sequence_id: u64,
    /// Total count (for paginated responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self {
            data,
            sequence_id,
            total: None,
        }
    }

    pub fn with_total(data: T, sequence_id: u64, total: usize) -> Self {
        Self {
            data,
            sequence_id,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }
}
