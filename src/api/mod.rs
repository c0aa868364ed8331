//! API module for the HTTP and WebSocket endpoints

pub mod http;
pub mod ws;
