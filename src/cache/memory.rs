//! In-process memory backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheBackend, CacheEntry, ExpirationPolicy};
use crate::error::Result;

// == Memory Backend ==
/// Volatile map from cache key to entry, owned by one cache instance.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        Ok(count)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }

    async fn purge_expired(&self, policy: &ExpirationPolicy) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !policy.is_expired(entry));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_put_and_get() {
        let backend = MemoryBackend::new();
        let entry = CacheEntry::new(json!("value1"));

        backend.put("key1", &entry).await.unwrap();

        assert_eq!(backend.get("key1").await.unwrap(), Some(entry));
        assert_eq!(backend.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let backend = MemoryBackend::new();
        assert!(backend.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let backend = MemoryBackend::new();

        backend.put("key1", &CacheEntry::new(json!(1))).await.unwrap();
        backend.put("key1", &CacheEntry::new(json!(2))).await.unwrap();

        let entry = backend.get("key1").await.unwrap().unwrap();
        assert_eq!(entry.value, json!(2));
        assert_eq!(backend.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let backend = MemoryBackend::new();
        assert!(backend.remove("nonexistent").await.is_ok());
    }

    #[tokio::test]
    async fn test_clear() {
        let backend = MemoryBackend::new();
        backend.put("a", &CacheEntry::new(json!(1))).await.unwrap();
        backend.put("b", &CacheEntry::new(json!(2))).await.unwrap();

        assert_eq!(backend.clear().await.unwrap(), 2);
        assert_eq!(backend.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let backend = MemoryBackend::new();
        let policy = ExpirationPolicy::new(Some(Duration::from_secs(60)));

        backend
            .put("stale", &CacheEntry::with_timestamp(json!(1), 0))
            .await
            .unwrap();
        backend.put("fresh", &CacheEntry::new(json!(2))).await.unwrap();

        assert_eq!(backend.purge_expired(&policy).await.unwrap(), 1);
        assert!(backend.get("stale").await.unwrap().is_none());
        assert!(backend.get("fresh").await.unwrap().is_some());
    }
}
