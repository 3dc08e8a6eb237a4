//! Whole-document endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use super::ApiResponse;
use crate::api::websocket::state::AppState;

/// GET /api/state - The full metrics document
///
/// Mirrors DashboardState one-to-one. Clients use it to recover after a
/// WebSocket reconnect.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let doc = state.load_state().await;
    Json(ApiResponse::new(doc, state.current_sequence_id()))
}

/// GET /api/stats - File size and record counts
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.load_stats().await;
    Json(ApiResponse::new(stats, state.current_sequence_id()))
}
