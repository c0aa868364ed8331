//! WebSocket relay endpoint
//!
//! Provides the `/ws` endpoint: snapshot on connect, upsert-and-broadcast on
//! every location report, eviction on stop or disconnect. The envelope
//! overlays (auth gate, route scoping, share toggles) sit on top of the same
//! upsert-and-broadcast core.

pub mod events;
pub mod handler;
pub mod session;
pub mod state;

pub use handler::ws_handler;
pub use state::{AppState, Snapshot};
