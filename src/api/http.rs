//! HTTP server setup with Axum

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use super::ws::{state::AppState, ws_handler};
use crate::config::RelayConfig;

/// Create the Axum router with the relay endpoints
pub fn create_router(state: Arc<AppState>, config: &RelayConfig) -> Router {
    Router::new()
        // WebSocket relay endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS configuration; `*` allows any origin (the dev default carried over
/// from the original deployment), anything else is taken as one exact origin
fn cors_layer(config: &RelayConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.cors_origin == "*" {
        cors.allow_origin(Any)
    } else {
        match config.cors_origin.parse::<HeaderValue>() {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                eprintln!(
                    "[Relay] WARNING: invalid RELAY_CORS_ORIGIN {:?}, falling back to *",
                    config.cors_origin
                );
                cors.allow_origin(Any)
            }
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let config = RelayConfig::default();
        let state = Arc::new(AppState::new(&config));
        let app = create_router(state, &config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let config = RelayConfig::default();
        let state = Arc::new(AppState::new(&config));
        let app = create_router(state, &config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
