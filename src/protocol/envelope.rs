//! Wire envelope types
//!
//! Every frame on the socket is a JSON envelope `{type, request_id?, payload}`.
//! The baseline Socket.IO event names (`sendLocation`, `stopSharing`,
//! `locationUpdate`) travel as `type` values alongside the dotted vehicle and
//! route event names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound frame: event name plus an opaque payload, dispatched by `type`
#[derive(Deserialize, Debug, Clone)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,

    /// Client-chosen correlation id, echoed in acks and errors
    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Error payload sent back on the `error` event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "bad_request".to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "unauthorized".to_string(),
            message: message.into(),
        }
    }

    pub fn lagged(missed: u64) -> Self {
        Self {
            code: "lagged".to_string(),
            message: format!("Missed {} snapshots, next update restores full state", missed),
        }
    }
}

/// Inbound event names
pub mod events {
    pub const SEND_LOCATION: &str = "sendLocation";
    pub const STOP_SHARING: &str = "stopSharing";
    pub const AUTH: &str = "auth";
    pub const VEHICLE_LOCATION_BROADCAST: &str = "vehicle.location.broadcast";
    pub const VEHICLE_LOCATION_SHARE: &str = "vehicle.location.share";
    pub const ROUTE_SUBSCRIBE: &str = "route.subscribe";
    pub const ROUTE_UNSUBSCRIBE: &str = "route.unsubscribe";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_envelope() {
        let env = Envelope::parse(r#"{"type":"sendLocation","payload":{"userId":"a"}}"#).unwrap();
        assert_eq!(env.kind, "sendLocation");
        assert!(env.request_id.is_none());
        assert_eq!(env.payload["userId"], "a");
    }

    #[test]
    fn test_parse_with_request_id() {
        let env = Envelope::parse(
            r#"{"type":"route.subscribe","request_id":"req-1","payload":{"route_id":"r-9"}}"#,
        )
        .unwrap();
        assert_eq!(env.kind, "route.subscribe");
        assert_eq!(env.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let env = Envelope::parse(r#"{"type":"stopSharing"}"#).unwrap();
        assert!(env.payload.is_null());
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(Envelope::parse(r#"{"payload":{}}"#).is_err());
    }
}
