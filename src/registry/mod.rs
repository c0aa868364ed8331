//! Location registry - the relay's single-writer state
//!
//! Holds the identity -> latest-record map and the connection -> identity
//! binding map behind one mutex. Created at process start, mutated only
//! through the operations below, discarded on process exit. Nothing is
//! persisted.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::{ConnectionId, LocationRecord};

#[derive(Default)]
struct RegistryInner {
    /// Retained records in insertion/update order. Linear scan is fine at
    /// relay scale (tens to low hundreds of live identities).
    records: Vec<LocationRecord>,

    /// Which identity each connection last reported, for disconnect eviction
    bindings: HashMap<ConnectionId, String>,
}

/// Thread-safe registry of the latest known position per identity key
pub struct LocationRegistry {
    inner: Mutex<RegistryInner>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Ordered clone of all retained records (insertion/update order)
    pub fn snapshot(&self) -> Vec<LocationRecord> {
        self.inner.lock().records.clone()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }

    /// Upsert a record under its identity key and bind the connection to it.
    ///
    /// Replaces in place when the key already exists (keeping its position),
    /// appends otherwise. Returns `false` without mutating anything when the
    /// identity key is empty.
    pub fn upsert(&self, conn: ConnectionId, record: LocationRecord) -> bool {
        if record.identity_key().is_empty() {
            return false;
        }

        let mut inner = self.inner.lock();
        let key = record.identity_key().to_string();

        match inner.records.iter_mut().find(|r| r.identity_key() == key) {
            Some(existing) => *existing = record,
            None => inner.records.push(record),
        }
        inner.bindings.insert(conn, key);
        true
    }

    /// Remove the record for `key` and clear the connection binding when it
    /// matches. Removal is unconditional on ownership: any connection may
    /// evict any key. Returns whether a record was removed.
    pub fn stop_sharing(&self, conn: ConnectionId, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }

        let mut inner = self.inner.lock();
        let before = inner.records.len();
        inner.records.retain(|r| r.identity_key() != key);

        if inner.bindings.get(&conn).is_some_and(|bound| bound == key) {
            inner.bindings.remove(&conn);
        }

        inner.records.len() != before
    }

    /// Clean up after a closed connection: evict the record for whatever
    /// identity it last reported. The binding is cleared regardless.
    /// Returns whether a record was removed (i.e. whether the remaining
    /// clients need a fresh snapshot).
    pub fn disconnect(&self, conn: ConnectionId) -> bool {
        let mut inner = self.inner.lock();
        let Some(key) = inner.bindings.remove(&conn) else {
            return false;
        };

        let before = inner.records.len();
        inner.records.retain(|r| r.identity_key() != key);
        inner.records.len() != before
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
