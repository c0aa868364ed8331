//! Relay wire protocol types

mod envelope;

pub use envelope::{events, Envelope, ErrorPayload};
