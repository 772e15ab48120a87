//! Cache Entry Module
//!
//! Defines the stored record for a single cached result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A cached result together with its insertion time.
///
/// This is also the on-disk record written by the file backend:
/// `{"value": <json>, "timestamp": <epoch millis>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored (serialized) result
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self::with_timestamp(value, current_timestamp_ms())
    }

    /// Creates an entry with an explicit creation timestamp.
    pub fn with_timestamp(value: Value, timestamp: u64) -> Self {
        Self { value, timestamp }
    }

    // == Age ==
    /// Returns how old the entry is at `now` in milliseconds.
    ///
    /// Timestamps in the future (clock skew across processes sharing a cache
    /// directory) count as age zero.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
