// =====================================================================================
// RESPONSE CACHE MANAGER
// =====================================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(test)]
use mock_instant::Instant;
#[cfg(not(test))]
use std::time::Instant;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::CacheStats;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub timestamp: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(data: Value, ttl: Duration) -> Self {
        Self {
            data,
            timestamp: Instant::now(),
            ttl,
        }
    }

    /// Stale once strictly more than `ttl` has passed since the entry was stored.
    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > self.ttl
    }
}

/// In-memory response cache with lazy expiry.
///
/// Entries are only dropped when read after their TTL, when explicitly
/// invalidated, or by [`CacheManager::purge_expired`]. There is no size bound.
#[derive(Debug, Default)]
pub struct CacheManager {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    expired_count: AtomicU64,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss: key={}", key);
                return None;
            }
            Some(entry) if !entry.is_expired() => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit: key={}", key);
                return Some(entry.data.clone());
            }
            Some(_) => {}
        }

        entries.remove(key);
        self.expired_count.fetch_add(1, Ordering::Relaxed);
        self.miss_count.fetch_add(1, Ordering::Relaxed);
        debug!("Cache expired: key={}", key);
        None
    }

    #[instrument(skip(self, data))]
    pub async fn set(&self, key: &str, data: Value, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(data, ttl));
        debug!("Cache set: key={}, ttl={:?}", key, ttl);
    }

    pub async fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(key).is_some()
    }

    /// Drops every entry whose key contains `pattern`.
    pub async fn invalidate_matching(&self, pattern: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.contains(pattern));
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Cache invalidated {} entries matching '{}'", removed, pattern);
        }
        removed
    }

    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();

        self.expired_count.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!("Cache cleared: {} entries dropped", removed);
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if lookups > 0 {
                hits as f64 / lookups as f64
            } else {
                0.0
            },
            total_entries: self.len().await as u64,
            expired_evictions: self.expired_count.load(Ordering::Relaxed),
        }
    }
}
