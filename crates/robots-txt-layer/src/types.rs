//! Core types for the robots.txt layer

use serde::Serialize;
use tokio::time::Instant;

/// A cached rule set. Replaced wholesale on refresh, never edited in place.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub source: String,
    pub content: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Counter values at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub external_calls: u64,
    pub errors: u64,
}
