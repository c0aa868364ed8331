//! Shared application state for WebSocket connections

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::auth::RelayAuth;
use crate::config::RelayConfig;
use crate::registry::LocationRegistry;
use crate::types::{ConnectionId, LocationRecord};

/// One full snapshot as it travels the fan-out channel. Shared, so a
/// thousand subscribers clone a pointer, not the record list.
pub type Snapshot = Arc<Vec<LocationRecord>>;

/// State shared by every connection: the registry, the fan-out channel,
/// and the optional auth gate.
pub struct AppState {
    pub registry: LocationRegistry,
    snapshot_tx: broadcast::Sender<Snapshot>,
    conn_counter: AtomicU64,
    auth: Option<RelayAuth>,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Self {
        let (snapshot_tx, _) = broadcast::channel(config.channel_capacity);

        Self {
            registry: LocationRegistry::new(),
            snapshot_tx,
            conn_counter: AtomicU64::new(0),
            auth: config.jwt_secret.as_deref().map(RelayAuth::new),
        }
    }

    pub fn next_connection_id(&self) -> ConnectionId {
        ConnectionId(self.conn_counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Subscribe to receive every snapshot broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Send the current registry contents to every subscriber, the sender's
    /// own connection included. Send errors just mean nobody is listening.
    pub fn broadcast_snapshot(&self) {
        let snapshot = Arc::new(self.registry.snapshot());
        let _ = self.snapshot_tx.send(snapshot);
    }

    /// Whether operations must be preceded by a successful `auth` event
    pub fn auth_required(&self) -> bool {
        self.auth.is_some()
    }

    pub fn auth(&self) -> Option<&RelayAuth> {
        self.auth.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        let state = AppState::new(&RelayConfig::default());
        let a = state.next_connection_id();
        let b = state.next_connection_id();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_subscribers_receive_broadcast_snapshots() {
        let state = AppState::new(&RelayConfig::default());
        let mut rx = state.subscribe();

        let conn = state.next_connection_id();
        state
            .registry
            .upsert(conn, LocationRecord::new("a", 1.0, 1.0, 100));
        state.broadcast_snapshot();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].user_id, "a");
    }

    #[test]
    fn test_broadcast_without_subscribers_is_fine() {
        let state = AppState::new(&RelayConfig::default());
        state.broadcast_snapshot();
    }

    #[test]
    fn test_auth_gate_follows_config() {
        let open = AppState::new(&RelayConfig::default());
        assert!(!open.auth_required());

        let gated = AppState::new(&RelayConfig {
            jwt_secret: Some("secret-key-for-the-auth-gate".to_string()),
            ..RelayConfig::default()
        });
        assert!(gated.auth_required());
    }
}
