//! In-process cache built on moka with per-entry TTLs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use tracing::trace;

use crate::AggregateCache;

const DEFAULT_MAX_CAPACITY: u64 = 100_000;

/// A cached value together with the TTL fixed at write time.
#[derive(Debug, Clone, Copy)]
struct Entry {
    value: i64,
    ttl: Duration,
}

/// Expires each entry after its own TTL rather than a cache-wide one;
/// the TTL carries "time until the owning user's next local midnight".
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Moka-backed aggregate cache.
pub struct MemoryCache {
    inner: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY)
    }
}

#[async_trait]
impl AggregateCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<i64> {
        let hit = self.inner.get(key).await.map(|entry| entry.value);
        trace!(key, hit = hit.is_some(), "cache lookup");
        hit
    }

    async fn put(&self, key: &str, value: i64, ttl: Duration) {
        // A zero TTL means the local day is already over; caching
        // would serve a dead value.
        if ttl.is_zero() {
            return;
        }
        self.inner.insert(key.to_string(), Entry { value, ttl }).await;
    }

    async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
