//! Environment-driven relay configuration

use std::env;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// CORS allow-origin; `*` (the default) is permissive and meant for
    /// development only
    pub cors_origin: String,

    /// HS256 secret for the auth gate; when absent the relay runs open
    pub jwt_secret: Option<String>,

    /// Broadcast channel buffer; slow clients past this many pending
    /// snapshots get a lagged error and catch up on the next one
    pub channel_capacity: usize,
}

impl RelayConfig {
    /// Load configuration from `RELAY_*` environment variables
    pub fn from_env() -> Self {
        let host = env::var("RELAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("RELAY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let cors_origin = env::var("RELAY_CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        let jwt_secret = env::var("RELAY_JWT_SECRET").ok().filter(|s| !s.is_empty());

        let channel_capacity = env::var("RELAY_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1024);

        Self {
            host,
            port,
            cors_origin,
            jwt_secret,
            channel_capacity,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origin: "*".to_string(),
            jwt_secret: None,
            channel_capacity: 1024,
        }
    }
}
