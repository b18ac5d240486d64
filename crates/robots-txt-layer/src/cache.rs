//! In-memory TTL cache for external rule sets
//!
//! Expiry is lazy: stale entries read as absent and are overwritten by the
//! next successful fetch. Two concurrent misses on one key may both fetch;
//! the last `put` wins.

use crate::types::CacheEntry;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Longest lifetime an entry can get; larger TTLs are clamped to it
const MAX_ENTRY_TTL: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Rule-set cache keyed by source identifier (file path or URL)
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached content for `key`, or `None` if absent or expired
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.is_expired(Instant::now()) {
            debug!(source = %key, "Cache entry expired");
            return None;
        }

        Some(entry.content.clone())
    }

    /// Store `content` under `key` for `ttl`, replacing any previous entry
    pub async fn put(&self, key: &str, content: String, ttl: Duration) {
        let entry = CacheEntry {
            source: key.to_string(),
            content,
            expires_at: Instant::now() + ttl.min(MAX_ENTRY_TTL),
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
