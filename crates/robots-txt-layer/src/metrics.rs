//! Optional process-lifetime counters

use crate::types::MetricsSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters, only incremented when enabled.
///
/// Kept apart from the cache lock so counting never serializes the fetch path.
#[derive(Debug, Default)]
pub struct Metrics {
    enabled: bool,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    external_calls: AtomicU64,
    errors: AtomicU64,
}

impl Metrics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_cache_hit(&self) {
        self.bump(&self.cache_hits);
    }

    pub fn record_cache_miss(&self) {
        self.bump(&self.cache_misses);
    }

    pub fn record_external_call(&self) {
        self.bump(&self.external_calls);
    }

    pub fn record_error(&self) {
        self.bump(&self.errors);
    }

    /// Current values, or `None` when metrics are disabled
    pub fn snapshot(&self) -> Option<MetricsSnapshot> {
        if !self.enabled {
            return None;
        }

        Some(MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            external_calls: self.external_calls.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        })
    }

    fn bump(&self, counter: &AtomicU64) {
        if self.enabled {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}
