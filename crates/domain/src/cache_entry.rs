use super::{RecordType, ResourceRecord};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in unix seconds, the unit of `stored_at`.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// One cached RRset: every value sharing a `(name, type)` key.
///
/// An entry is expired once strictly more than `ttl` seconds have passed
/// since `stored_at`. `CacheEntry::default()` is the empty sentinel and is
/// never a cache hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub values: Vec<String>,
    /// Time to live in seconds
    pub ttl: u32,
    /// Round trip of the exchange that produced the entry, informational.
    pub rtt_ms: u32,
    /// Unix seconds at which the entry was stored.
    pub stored_at: i64,
}

impl CacheEntry {
    pub fn new(values: Vec<String>, ttl: u32, rtt_ms: u32, stored_at: i64) -> Self {
        Self {
            values,
            ttl,
            rtt_ms,
            stored_at,
        }
    }

    pub fn is_empty_sentinel(&self) -> bool {
        self.ttl == 0 && self.rtt_ms == 0 && self.stored_at == 0 && self.values.is_empty()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now - self.stored_at > i64::from(self.ttl)
    }

    pub fn remaining_ttl(&self, now: i64) -> u32 {
        let elapsed = (now - self.stored_at).max(0);
        u32::try_from(i64::from(self.ttl) - elapsed).unwrap_or(0)
    }

    /// Add a value if not already present, keeping insertion order.
    pub fn merge_value(&mut self, value: &str) {
        if !self.values.iter().any(|v| v == value) {
            self.values.push(value.to_string());
        }
    }

    /// Expand the RRset back into records with the TTL left at `now`.
    pub fn to_records(&self, name: &str, record_type: RecordType, now: i64) -> Vec<ResourceRecord> {
        let ttl = self.remaining_ttl(now);
        self.values
            .iter()
            .map(|v| ResourceRecord::new(name, ttl, record_type, v))
            .collect()
    }
}
