//! HTTP server setup with Axum

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::rest::{agents, dashboard, events};
use super::websocket::{handler::ws_handler, run_poller, state::AppState};
use crate::store::MetricsStore;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route("/api/state", get(dashboard::get_state))
        .route("/api/stats", get(dashboard::get_stats))
        .route("/api/agents", get(agents::list_agents))
        .route("/api/agents/:name", get(agents::get_agent))
        .route("/api/events", get(events::list_events))
        .route("/api/sessions", get(events::list_sessions))
        .layer(cors)
        .with_state(state)
}

/// Run the dashboard server until the listener fails
///
/// Spawns the store poller that turns file changes into `state_updated`
/// broadcasts, then serves the router on `addr`.
pub async fn serve(store: Arc<MetricsStore>, addr: SocketAddr, poll_interval: Duration) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(store));
    tokio::spawn(run_poller(state.clone(), poll_interval));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "dashboard server listening");
    axum::serve(listener, create_router(state)).await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
