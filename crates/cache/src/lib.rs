//! Aggregate cache for derived per-user values.
//!
//! Never a source of truth: every entry is reconstructible from the
//! durable stores, and the whole cache may be dropped at any time.
//! Backend failures degrade to a miss inside the adapter; no error
//! crosses this trait.

pub mod keys;
pub mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use std::time::Duration;

/// Key/value cache with per-entry expiry. TTLs are always "time until
/// the owning user's next local midnight", recomputed at write time.
#[async_trait]
pub trait AggregateCache: Send + Sync {
    /// Returns the cached value, or `None` on miss. Unavailability is
    /// a miss.
    async fn get(&self, key: &str) -> Option<i64>;

    /// Stores `value` until `ttl` elapses. Best-effort.
    async fn put(&self, key: &str, value: i64, ttl: Duration);

    /// Drops the entry for `key`, if present. Best-effort.
    async fn invalidate(&self, key: &str);
}
