//! Fleet Relay - Binary Entry Point
//!
//! Starts the relay on the configured host/port and runs until ctrl-c.

use std::sync::Arc;

use fleet_relay::api::http::create_router;
use fleet_relay::api::ws::AppState;
use fleet_relay::config::RelayConfig;
use fleet_relay::types::RelayResult;

#[tokio::main]
async fn main() -> RelayResult<()> {
    let config = RelayConfig::from_env();
    let state = Arc::new(AppState::new(&config));

    if state.auth_required() {
        println!("[Relay] auth gate enabled");
    } else {
        println!("[Relay] running open (set RELAY_JWT_SECRET to require auth)");
    }

    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    println!(
        "[Relay] listening on {}:{} (ws endpoint at /ws)",
        config.host, config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("[Relay] shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("[Relay] failed to install ctrl-c handler: {}", e);
        return;
    }
    println!("[Relay] ctrl-c received, draining connections");
}
