//! Per-connection session state
//!
//! Everything here is owned by the connection's task; no locking. The
//! registry holds the cross-connection state.

use std::collections::HashSet;

use crate::auth::Claims;
use crate::types::{ConnectionId, LocationRecord};

/// State scoped to one WebSocket connection
pub struct Session {
    pub id: ConnectionId,

    /// Claims from a successful `auth` event, if any
    claims: Option<Claims>,

    /// Routes this connection subscribed to; empty means unscoped
    /// (receive everything)
    routes: HashSet<String>,

    /// Vehicles this connection toggled sharing off for
    disabled_vehicles: HashSet<String>,
}

impl Session {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            claims: None,
            routes: HashSet::new(),
            disabled_vehicles: HashSet::new(),
        }
    }

    pub fn authenticate(&mut self, claims: Claims) {
        self.claims = Some(claims);
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }

    pub fn subscribe_route(&mut self, route_id: &str) {
        self.routes.insert(route_id.to_string());
    }

    pub fn unsubscribe_route(&mut self, route_id: &str) {
        self.routes.remove(route_id);
    }

    /// Sharing defaults to enabled; `vehicle.location.share` with
    /// `enabled: false` turns it off for one vehicle on this connection.
    pub fn sharing_enabled(&self, vehicle_id: &str) -> bool {
        !self.disabled_vehicles.contains(vehicle_id)
    }

    pub fn set_sharing(&mut self, vehicle_id: &str, enabled: bool) {
        if enabled {
            self.disabled_vehicles.remove(vehicle_id);
        } else {
            self.disabled_vehicles.insert(vehicle_id.to_string());
        }
    }

    /// Apply this connection's route scope to an outbound snapshot.
    ///
    /// An unscoped session gets the full snapshot. A scoped one gets records
    /// on its subscribed routes, plus records that carry no route at all
    /// (those sit outside route scoping entirely).
    pub fn filter_snapshot(&self, records: &[LocationRecord]) -> Vec<LocationRecord> {
        if self.routes.is_empty() {
            return records.to_vec();
        }

        records
            .iter()
            .filter(|r| match &r.route_id {
                Some(route) => self.routes.contains(route),
                None => true,
            })
            .cloned()
            .collect()
    }
}
