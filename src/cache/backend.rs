//! Storage Backend Trait
//!
//! Common interface for the places cache entries can live.

use async_trait::async_trait;

use crate::cache::{CacheEntry, ExpirationPolicy};
use crate::error::Result;

/// A store of cache entries addressed by cache key.
///
/// Backends report every failure; deciding that a failure degrades to a miss
/// or a no-op is the job of [`TieredStorage`](crate::cache::TieredStorage).
/// Expiration is not applied here either: `get` returns whatever is stored.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Returns the stored entry, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Stores an entry, replacing any previous one for the key.
    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()>;

    /// Removes the entry for the key. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Removes every entry. Returns how many were removed.
    async fn clear(&self) -> Result<usize>;

    /// Number of stored entries.
    async fn len(&self) -> Result<usize>;

    /// Removes every entry the policy considers expired. Returns the count.
    async fn purge_expired(&self, policy: &ExpirationPolicy) -> Result<usize>;
}
