//! Fleet Relay
//!
//! A single-process live-location broadcast relay: clients report positions
//! over a WebSocket, the relay keeps the latest record per identity key
//! (last write wins, no history), and every change fans the full snapshot
//! out to all connected clients.
//!
//! # Modules
//!
//! - `types`: core data structures (`LocationRecord`, `ConnectionId`)
//! - `registry`: the single-writer identity -> latest-record state
//! - `protocol`: the `{type, request_id, payload}` wire envelope
//! - `api`: Axum HTTP router and the WebSocket connection handler
//! - `auth`: bearer-token validation for the optional auth gate
//! - `config`: `RELAY_*` environment configuration
//! - `utils`: timestamp helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fleet_relay::api::http::create_router;
//! use fleet_relay::api::ws::AppState;
//! use fleet_relay::config::RelayConfig;
//!
//! # async fn run() -> fleet_relay::types::RelayResult<()> {
//! let config = RelayConfig::from_env();
//! let state = Arc::new(AppState::new(&config));
//! let app = create_router(state, &config);
//!
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod protocol;
pub mod registry;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::ws::AppState;
pub use config::RelayConfig;
pub use registry::LocationRegistry;
pub use types::{ConnectionId, LocationRecord, RelayResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
