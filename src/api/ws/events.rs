//! WebSocket event payloads
//!
//! Inbound payload shapes for each envelope type, and the outbound
//! server-to-client events.

use serde::{Deserialize, Serialize};

use crate::protocol::ErrorPayload;
use crate::types::LocationRecord;
use crate::utils::time::current_timestamp_millis;

/// `stopSharing` payload
#[derive(Deserialize, Debug, Clone)]
pub struct StopSharingPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// `auth` payload
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
}

/// `vehicle.location.broadcast` payload (snake_case on the wire, unlike the
/// baseline camelCase records)
#[derive(Deserialize, Debug, Clone)]
pub struct VehicleBroadcastPayload {
    pub vehicle_id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
    #[serde(default)]
    pub recorded_at: Option<String>,
}

impl VehicleBroadcastPayload {
    /// Fold into a retained record keyed by the vehicle identity. The
    /// snapshot timestamp comes from `recorded_at` when it parses, else
    /// from the server clock.
    pub fn into_record(self) -> LocationRecord {
        let timestamp = self
            .recorded_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(current_timestamp_millis);

        LocationRecord {
            user_id: self.vehicle_id.clone(),
            lat: self.lat,
            lng: self.lng,
            timestamp,
            vehicle_id: Some(self.vehicle_id),
            plate_number: self.plate_number,
            route_id: self.route_id,
            heading: self.heading,
            speed_mps: self.speed_mps,
            accuracy_m: self.accuracy_m,
            recorded_at: self.recorded_at,
        }
    }
}

/// `vehicle.location.share` payload
#[derive(Deserialize, Debug, Clone)]
pub struct VehicleSharePayload {
    pub vehicle_id: String,
    pub enabled: bool,
}

/// `route.subscribe` / `route.unsubscribe` payload, echoed back in acks
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoutePayload {
    pub route_id: String,
}

/// Server-to-client events
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Full ordered snapshot of all retained records; sent to every client
    /// on every change and to each new client on connect
    #[serde(rename = "locationUpdate")]
    LocationUpdate { payload: Vec<LocationRecord> },

    #[serde(rename = "route.subscribe.ok")]
    RouteSubscribeOk {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: RoutePayload,
    },

    #[serde(rename = "route.unsubscribe.ok")]
    RouteUnsubscribeOk {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: RoutePayload,
    },

    #[serde(rename = "error")]
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: ErrorPayload,
    },
}

impl ServerEvent {
    pub fn error(request_id: Option<String>, payload: ErrorPayload) -> Self {
        Self::Error {
            request_id,
            payload,
        }
    }
}
