//! Event and session log endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{default_limit, ApiResponse, PaginationParams};
use crate::api::websocket::state::AppState;
use crate::types::{AgentEvent, EventStatus, SessionSummary};

/// Query parameters for listing events
#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    /// Maximum number of items to return (default: 100, max: 500)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of items to skip
    #[serde(default)]
    pub offset: usize,
    /// Only events of this agent
    pub agent: Option<String>,
    /// Only events with this status
    pub status: Option<EventStatus>,
}

/// GET /api/events - Event log, newest first
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListEventsParams>,
) -> impl IntoResponse {
    let doc = state.load_state().await;

    let matching: Vec<&AgentEvent> = doc
        .events
        .iter()
        .rev()
        .filter(|e| params.agent.as_deref().map_or(true, |a| e.agent_name == a))
        .filter(|e| params.status.as_ref().map_or(true, |s| &e.status == s))
        .collect();
    let total = matching.len();

    let page: Vec<AgentEvent> = matching
        .into_iter()
        .skip(params.offset)
        .take(params.limit.min(500))
        .cloned()
        .collect();

    Json(ApiResponse::with_total(page, state.current_sequence_id(), total))
}

/// GET /api/sessions - Session summaries, newest first
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let doc = state.load_state().await;
    let total = doc.sessions.len();

    let page: Vec<SessionSummary> = doc
        .sessions
        .iter()
        .rev()
        .skip(params.offset)
        .take(params.normalized_limit())
        .cloned()
        .collect();

    Json(ApiResponse::with_total(page, state.current_sequence_id(), total))
}
