//! Tiered Storage Module
//!
//! Composes the memory and file backends according to the storage mode and
//! applies the expiration policy on every read.

use std::path::Path;

use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheEntry, ExpirationPolicy, FileBackend, MemoryBackend};
use crate::config::StorageMode;

// == Tiered Storage ==
/// The backends selected for one cache instance.
///
/// In `both` mode reads go to memory first, fall through to disk, and
/// promote disk hits into memory. Writes and removals touch every backend.
///
/// Backend failures never escape: reads degrade to a miss, writes and
/// removals to a no-op.
#[derive(Debug)]
pub struct TieredStorage {
    memory: Option<MemoryBackend>,
    file: Option<FileBackend>,
    policy: ExpirationPolicy,
}

impl TieredStorage {
    // == Constructor ==
    /// Builds the backends for `mode`, creating `dir` when disk is involved.
    pub fn new(mode: StorageMode, dir: &Path, policy: ExpirationPolicy) -> Self {
        let memory = mode.uses_memory().then(MemoryBackend::new);
        let file = mode.uses_file().then(|| FileBackend::new(dir));

        if let Some(file) = &file {
            if let Err(e) = file.ensure_dir() {
                warn!("Failed to create cache directory: {}", e);
            }
        }

        Self {
            memory,
            file,
            policy,
        }
    }

    // == Get ==
    /// Returns a live entry for `key`, if any backend holds one.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        if let Some(memory) = &self.memory {
            if let Some(entry) = self.lookup(memory, key).await {
                return Some(entry);
            }
        }

        let file = self.file.as_ref()?;
        let entry = self.lookup(file, key).await?;

        if let Some(memory) = &self.memory {
            debug!("Promoting disk entry into memory");
            self.store_in(memory, key, &entry).await;
        }
        Some(entry)
    }

    /// Reads one backend, evicting the entry if it has expired.
    async fn lookup(&self, backend: &dyn CacheBackend, key: &str) -> Option<CacheEntry> {
        match backend.get(key).await {
            Ok(Some(entry)) if self.policy.is_expired(&entry) => {
                debug!("Evicting expired {} entry", backend.name());
                self.remove_from(backend, key).await;
                None
            }
            Ok(entry) => entry,
            Err(e) => {
                debug!("Treating unreadable {} entry as a miss: {}", backend.name(), e);
                None
            }
        }
    }

    // == Put ==
    /// Writes the entry to every configured backend.
    pub async fn put(&self, key: &str, entry: &CacheEntry) {
        for backend in self.backends() {
            self.store_in(backend, key, entry).await;
        }
    }

    async fn store_in(&self, backend: &dyn CacheBackend, key: &str, entry: &CacheEntry) {
        if let Err(e) = backend.put(key, entry).await {
            warn!("Failed to write {} cache entry: {}", backend.name(), e);
        }
    }

    // == Remove ==
    /// Removes the entry from every configured backend.
    pub async fn remove(&self, key: &str) {
        for backend in self.backends() {
            self.remove_from(backend, key).await;
        }
    }

    async fn remove_from(&self, backend: &dyn CacheBackend, key: &str) {
        if let Err(e) = backend.remove(key).await {
            debug!("Ignoring {} removal failure: {}", backend.name(), e);
        }
    }

    // == Clear ==
    /// Empties every configured backend. Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        let mut removed = 0;
        for backend in self.backends() {
            match backend.clear().await {
                Ok(count) => removed += count,
                Err(e) => warn!("Failed to clear {} cache: {}", backend.name(), e),
            }
        }
        removed
    }

    // == Counts ==
    /// Entries held in memory; zero when memory is not configured.
    pub async fn memory_len(&self) -> usize {
        match &self.memory {
            Some(memory) => memory.len().await.unwrap_or(0),
            None => 0,
        }
    }

    /// Files in the cache directory; zero when disk is not configured.
    pub async fn file_len(&self) -> usize {
        match &self.file {
            Some(file) => file.len().await.unwrap_or(0),
            None => 0,
        }
    }

    // == Purge ==
    /// Removes expired entries from every backend.
    pub async fn purge_expired(&self) -> usize {
        if self.policy.ttl().is_none() {
            return 0;
        }

        let mut removed = 0;
        for backend in self.backends() {
            match backend.purge_expired(&self.policy).await {
                Ok(count) => removed += count,
                Err(e) => warn!("Failed to purge {} cache: {}", backend.name(), e),
            }
        }
        removed
    }

    fn backends(&self) -> impl Iterator<Item = &dyn CacheBackend> {
        let memory = self.memory.iter().map(|b| b as &dyn CacheBackend);
        let file = self.file.iter().map(|b| b as &dyn CacheBackend);
        memory.chain(file)
    }
}
