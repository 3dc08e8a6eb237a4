//! Agent profile endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{default_limit, ApiError, ApiResponse};
use crate::api::websocket::state::AppState;
use crate::leaderboard::{rank, SortKey};
use crate::types::{AgentEvent, AgentProfile};

/// Query parameters for listing agents
#[derive(Debug, Deserialize)]
pub struct ListAgentsParams {
    /// Ranking column
    #[serde(default)]
    pub sort: SortKey,
    /// Maximum number of agents to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// GET /api/agents - Ranked agent profiles
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAgentsParams>,
) -> impl IntoResponse {
    let doc = state.load_state().await;
    let total = doc.agents.len();
    let ranked: Vec<AgentProfile> = rank(&doc, params.sort, params.limit)
        .into_iter()
        .cloned()
        .collect();

    Json(ApiResponse::with_total(ranked, state.current_sequence_id(), total))
}

/// Response for a single agent
#[derive(Debug, Serialize)]
pub struct AgentDetail {
    #[serde(flatten)]
    pub profile: AgentProfile,
    /// This agent's events still retained in the log, newest first
    pub events: Vec<AgentEvent>,
}

/// GET /api/agents/:name - Single profile with its events
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let doc = state.load_state().await;

    match doc.agents.get(&name) {
        Some(profile) => {
            let mut events: Vec<AgentEvent> = doc.events_for(&name).cloned().collect();
            events.reverse();
            let detail = AgentDetail {
                profile: profile.clone(),
                events,
            };
            (StatusCode::OK, Json(ApiResponse::new(detail, state.current_sequence_id()))).into_response()
        }
        None => {
            let error = ApiError::not_found(format!("Agent '{}' not found", name));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
    }
}
