//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::debug;

use super::events::{ClientMessage, PongMessage, SnapshotMessage, WelcomeMessage};
use super::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before the welcome so no update slips between them
    let mut rx = state.subscribe();

    let welcome = WelcomeMessage::new(state.current_sequence_id());
    if let Ok(json) = serde_json::to_string(&welcome) {
        if socket.send(Message::Text(json)).await.is_err() {
            return; // Client disconnected immediately
        }
    }

    loop {
        tokio::select! {
            // Broadcast events to client
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if socket.send(Message::Text(json)).await.is_err() {
                                break; // Client disconnected
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Client is too slow and missed updates; it should
                        // request a snapshot
                        let error_msg = serde_json::json!({
                            "type": "error",
                            "code": "lagged",
                            "message": format!("Missed {} updates, request a snapshot", n)
                        });
                        let _ = socket.send(Message::Text(error_msg.to_string())).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break; // Channel closed
                    }
                }
            }

            // Handle client messages
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &state).await {
                            break; // Client requested close or error
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }
        }
    }

    debug!("websocket client disconnected");
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket, state: &AppState) -> bool {
    match msg {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => {
                    if let Ok(json) = serde_json::to_string(&PongMessage::default()) {
                        let _ = socket.send(Message::Text(json)).await;
                    }
                }
                Ok(ClientMessage::Snapshot) => {
                    let doc = state.load_state().await;
                    let reply = SnapshotMessage::new(state.current_sequence_id(), &doc);
                    if let Ok(json) = serde_json::to_string(&reply) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return false;
                        }
                    }
                }
                Err(_) => {} // Ignore unknown messages
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => {
            let _ = socket.send(Message::Pong(data)).await;
            true
        }
        Message::Pong(_) => true, // Ignore pong responses
        Message::Close(_) => false, // Client requested close
    }
}
