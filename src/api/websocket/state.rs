//! Shared application state for HTTP and WebSocket handlers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::{DashboardEvent, WsMessage};
use crate::store::MetricsStore;
use crate::types::{DashboardState, StoreStats};

/// Shared application state
pub struct AppState {
    /// The project's metrics store
    pub store: Arc<MetricsStore>,

    /// Broadcast channel for sending events to all connected clients
    pub event_tx: broadcast::Sender<WsMessage>,

    /// Monotonically increasing sequence counter
    pub sequence_counter: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<MetricsStore>) -> Self {
        // Slow clients that fall more than 256 messages behind get a `lagged`
        // error and should request a snapshot
        let (event_tx, _) = broadcast::channel(256);

        Self {
            store,
            event_tx,
            sequence_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Broadcast a dashboard event to all connected WebSocket clients
    pub fn broadcast(&self, event: DashboardEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };

        // Ignore send errors - they just mean no receivers are listening
        let _ = self.event_tx.send(msg);
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.event_tx.subscribe()
    }

    /// Load the document off the async runtime
    pub async fn load_state(&self) -> DashboardState {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.load()).await {
            Ok(state) => state,
            // The blocking task panicked; fall back to an unsynchronized read
            Err(_) => self.store.load(),
        }
    }

    /// Document plus the primary file's size, in one blocking task
    pub async fn load_state_with_size(&self) -> (DashboardState, u64) {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || read_with_size(&store)).await {
            Ok(read) => read,
            Err(_) => read_with_size(&self.store),
        }
    }

    /// Stats off the async runtime
    pub async fn load_stats(&self) -> StoreStats {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.get_stats())
            .await
            .unwrap_or_default()
    }
}

fn read_with_size(store: &MetricsStore) -> (DashboardState, u64) {
    let state = store.load();
    (state, store.file_size_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MetricsStore::new(StoreConfig::new(dir.path())));
        (AppState::new(store), dir)
    }

    fn updated() -> DashboardEvent {
        DashboardEvent::StateUpdated {
            updated_at: String::new(),
            stats: StoreStats::default(),
            new_events: vec![],
        }
    }

    #[tokio::test]
    async fn test_broadcast_increments_sequence() {
        let (state, _dir) = test_state();
        assert_eq!(state.current_sequence_id(), 0);

        state.broadcast(updated());

        assert_eq!(state.current_sequence_id(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_receives_events() {
        let (state, _dir) = test_state();
        let mut rx = state.subscribe();

        state.broadcast(updated());

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.sequence_id, 0);
        assert!(matches!(msg.event, DashboardEvent::StateUpdated { .. }));
    }

    #[tokio::test]
    async fn test_load_state_on_empty_store() {
        let (state, _dir) = test_state();
        let doc = state.load_state().await;
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_load_state_with_size_matches_file() {
        let (state, _dir) = test_state();
        let (_, size) = state.load_state_with_size().await;
        assert_eq!(size, 0);

        let saved = state.store.load_or_init().unwrap();
        let (doc, size) = state.load_state_with_size().await;

        assert_eq!(doc, saved);
        let on_disk = std::fs::metadata(state.store.config().primary_path()).unwrap().len();
        assert_eq!(size, on_disk);
        assert!(size > 0);
    }
}
