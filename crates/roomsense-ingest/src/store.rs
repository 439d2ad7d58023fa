//! In-memory telemetry store.
//!
//! Capped ring of received readings; the oldest records are evicted so the
//! service can run indefinitely without persistence.

use chrono::Utc;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Maximum number of retained records.
pub const STORE_CAP: usize = 1024;

/// One stored telemetry reading.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// Monotonically increasing id.
    pub id: u64,
    /// Server-side receive timestamp, RFC 3339.
    pub received_at: String,
    pub temperature: f64,
    pub humidity: f64,
    pub motion: String,
}

/// Shared telemetry store.
pub struct TelemetryStore {
    records: RwLock<VecDeque<TelemetryRecord>>,
    next_id: AtomicU64,
    cap: usize,
}

impl TelemetryStore {
    /// Creates an empty store with the default cap.
    pub fn new() -> Self {
        Self::with_cap(STORE_CAP)
    }

    /// Creates an empty store with a custom cap.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
            cap,
        }
    }

    /// Stores one reading, evicting the oldest record at capacity.
    pub fn insert(&self, temperature: f64, humidity: f64, motion: String) -> TelemetryRecord {
        let record = TelemetryRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            received_at: Utc::now().to_rfc3339(),
            temperature,
            humidity,
            motion,
        };

        let mut records = self.records.write().unwrap();
        if records.len() >= self.cap {
            records.pop_front();
        }
        records.push_back(record.clone());
        record
    }

    /// Returns all retained records, oldest first.
    pub fn all(&self) -> Vec<TelemetryRecord> {
        self.records.read().unwrap().iter().cloned().collect()
    }

    /// Returns the most recent record, if any.
    pub fn latest(&self) -> Option<TelemetryRecord> {
        self.records.read().unwrap().back().cloned()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// True when nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}
