//! Cache Facade Module
//!
//! Read-through caching around arbitrary async operations, plus the
//! [`Cached`] wrapper used to give a whole collaborator a cached view.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{
    CacheControl, CacheCounters, CacheEntry, CacheStats, CallArgs, ExpirationPolicy,
    JsonKeyDeriver, KeyDeriver, TieredStorage,
};
use crate::config::CacheConfig;

// == Cacheable ==
/// Coordinates key derivation, expiration, and storage for one cache instance.
///
/// The instance exclusively owns its memory backend; nothing is shared with
/// other instances except, possibly, the file backend directory.
pub struct Cacheable {
    config: CacheConfig,
    deriver: Arc<dyn KeyDeriver>,
    storage: TieredStorage,
    counters: CacheCounters,
    /// Operations eligible for caching, fixed at construction. `None` when
    /// the instance was built without a target and checks names per call.
    eligible: Option<HashSet<String>>,
}

impl Cacheable {
    // == Constructors ==
    /// Creates a cache that applies include/exclude to whatever operation
    /// name each call supplies.
    pub fn new(config: CacheConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates a cache for a target whose own operations are `operations`.
    ///
    /// Only names in `operations` that pass include/exclude are cached; any
    /// other name passes straight through.
    pub fn for_operations(config: CacheConfig, operations: &[&str]) -> Self {
        let eligible = operations
            .iter()
            .filter(|operation| config.allows(operation))
            .map(|operation| operation.to_string())
            .collect();
        Self::build(config, Some(eligible))
    }

    fn build(config: CacheConfig, eligible: Option<HashSet<String>>) -> Self {
        let deriver = config
            .key_deriver
            .clone()
            .unwrap_or_else(|| Arc::new(JsonKeyDeriver));
        let policy = ExpirationPolicy::new(config.ttl);
        let storage = TieredStorage::new(config.storage, &config.cache_dir, policy);

        debug!(
            "Cache initialized: storage={}, ttl={:?}, dir={}",
            config.storage,
            config.ttl,
            config.cache_dir.display()
        );

        Self {
            config,
            deriver,
            storage,
            counters: CacheCounters::default(),
            eligible,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Eligibility ==
    /// Whether calls to `operation` go through the cache at all.
    pub fn is_cached(&self, operation: &str) -> bool {
        match &self.eligible {
            Some(eligible) => eligible.contains(operation),
            None => self.config.allows(operation),
        }
    }

    // == Key ==
    /// Derives the cache key for `operation` called with `args`.
    ///
    /// Each tuple element is one argument, so `(vec![1, 2],)` and `(1, 2)`
    /// derive different keys. Returns `None` if an argument cannot be
    /// serialized.
    pub fn key_for<A: CallArgs>(&self, operation: &str, args: &A) -> Option<String> {
        match args.to_values() {
            Ok(values) => Some(self.deriver.derive(operation, &values)),
            Err(e) => {
                warn!("Arguments for {} are not serializable, not caching: {}", operation, e);
                None
            }
        }
    }

    // == Call ==
    /// Runs `compute` through the cache.
    ///
    /// 1. Resolves `control` against the instance defaults.
    /// 2. With `force`, evicts any stored entry for the key.
    /// 3. With `cache`, returns a live stored value without running `compute`.
    /// 4. Otherwise runs `compute`; a successful result is stored when `cache`
    ///    is set. Errors from `compute` are returned unchanged and never stored.
    ///
    /// Concurrent misses for the same key are not coalesced: each runs
    /// `compute`, and the last write wins.
    pub async fn call<A, V, E, F, Fut>(
        &self,
        operation: &str,
        args: &A,
        control: Option<CacheControl>,
        compute: F,
    ) -> Result<V, E>
    where
        A: CallArgs,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !self.is_cached(operation) {
            return compute().await;
        }

        let control = control
            .unwrap_or_default()
            .resolve(self.config.cache, self.config.force);

        let Some(key) = self.key_for(operation, args) else {
            return compute().await;
        };

        if control.force {
            debug!("Force refresh for {}", key);
            self.storage.remove(&key).await;
        }

        if control.cache {
            if let Some(value) = self.lookup::<V>(&key).await {
                self.counters.record_hit();
                debug!("Cache hit for {}", key);
                return Ok(value);
            }
            self.counters.record_miss();
            debug!("Cache miss for {}", key);
        }

        let result = compute().await?;

        if control.cache {
            match serde_json::to_value(&result) {
                Ok(value) => self.storage.put(&key, &CacheEntry::new(value)).await,
                Err(e) => warn!("Result of {} is not serializable, not caching: {}", operation, e),
            }
        }

        Ok(result)
    }

    /// Reads a live entry and decodes it as `V`. An entry that no longer
    /// decodes is evicted and reported as a miss.
    async fn lookup<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let entry = self.storage.get(key).await?;
        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Stored value for {} has an unexpected shape: {}", key, e);
                self.storage.remove(key).await;
                None
            }
        }
    }

    // == Clear ==
    /// Empties memory and deletes every file in the cache directory.
    ///
    /// Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        let removed = self.storage.clear().await;
        debug!("Cache cleared: {} entries removed", removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics without changing any state.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.storage.memory_len().await,
            file_entries: self.storage.file_len().await,
            hits: self.counters.hits(),
            misses: self.counters.misses(),
        }
    }

    // == Purge ==
    /// Removes every expired entry. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        self.storage.purge_expired().await
    }
}

// == Cache Target ==
/// A collaborator whose operations can be cached.
///
/// `OPERATIONS` names the collaborator's own cacheable operations; the
/// include/exclude options are applied to this list when it is wrapped.
pub trait CacheTarget {
    const OPERATIONS: &'static [&'static str];
}

// == Cached Wrapper ==
/// A target paired with its cache.
///
/// Collaborator traits are implemented for `Cached<T>` by delegating each
/// method through [`Cacheable::call`] with the method's name and arguments.
pub struct Cached<T> {
    inner: T,
    cache: Arc<Cacheable>,
}

impl<T: CacheTarget> Cached<T> {
    /// Wraps `inner`, computing operation eligibility once.
    pub fn wrap(inner: T, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: Arc::new(Cacheable::for_operations(config, T::OPERATIONS)),
        }
    }
}

impl<T> Cached<T> {
    /// The uncached target.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn cache(&self) -> &Cacheable {
        &self.cache
    }

    /// Shared handle to the cache, e.g. for a background purge task.
    pub fn cache_handle(&self) -> Arc<Cacheable> {
        Arc::clone(&self.cache)
    }

    pub async fn clear_cache(&self) -> usize {
        self.cache.clear().await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

}
