//! Location record types

use serde::{Deserialize, Serialize};

/// Latest known position for one identity key.
///
/// Exactly one record is retained per identity at any time; every inbound
/// report overwrites the previous one wholesale (no merge, no history).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Opaque identity key chosen by the client; not authenticated
    /// in the open (no-secret) configuration.
    pub user_id: String,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,

    /// Client-supplied capture time (Unix milliseconds)
    pub timestamp: i64,

    /// Vehicle identity, when the report came from a vehicle tracker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,

    /// Route this vehicle is currently serving; used for route-scoped
    /// snapshot filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    /// Heading in degrees clockwise from north
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,

    /// Capture time as reported by the vehicle tracker (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl LocationRecord {
    /// Create a minimal user-flavored record
    pub fn new(user_id: impl Into<String>, lat: f64, lng: f64, timestamp: i64) -> Self {
        Self {
            user_id: user_id.into(),
            lat,
            lng,
            timestamp,
            vehicle_id: None,
            plate_number: None,
            route_id: None,
            heading: None,
            speed_mps: None,
            accuracy_m: None,
            recorded_at: None,
        }
    }

    /// The key the relay retains this record under: the vehicle identity
    /// when present, the user identity otherwise.
    pub fn identity_key(&self) -> &str {
        self.vehicle_id.as_deref().unwrap_or(&self.user_id)
    }
}

/// Identifier assigned to each WebSocket connection, used only to know
/// which identity to evict when the connection closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = LocationRecord::new("driver-7", 10.5, 106.7, 1700000000000);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"userId\":\"driver-7\""));
        assert!(json.contains("\"timestamp\":1700000000000"));
        // Absent optional fields stay off the wire
        assert!(!json.contains("vehicleId"));
        assert!(!json.contains("routeId"));
    }

    #[test]
    fn test_record_parses_baseline_payload() {
        let json = r#"{"userId":"a","lat":1.0,"lng":2.0,"timestamp":100}"#;
        let record: LocationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user_id, "a");
        assert_eq!(record.identity_key(), "a");
    }

    #[test]
    fn test_missing_user_id_is_a_parse_error() {
        let json = r#"{"lat":1.0,"lng":2.0,"timestamp":100}"#;
        assert!(serde_json::from_str::<LocationRecord>(json).is_err());
    }

    #[test]
    fn test_identity_key_prefers_vehicle_id() {
        let mut record = LocationRecord::new("bus-12", 0.0, 0.0, 0);
        record.vehicle_id = Some("bus-12".to_string());
        record.route_id = Some("route-3".to_string());
        assert_eq!(record.identity_key(), "bus-12");
    }
}
