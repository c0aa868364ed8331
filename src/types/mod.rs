//! Data types for the fleet relay
//!
//! This module contains the core data structures shared across the crate.

mod location;

pub use location::{ConnectionId, LocationRecord};

/// Result type for relay operations
pub type RelayResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
