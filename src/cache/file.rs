//! File Backend Module
//!
//! Persists each entry as a JSON file named by the SHA-256 digest of its key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use crate::cache::{CacheBackend, CacheEntry, ExpirationPolicy};
use crate::error::{CacheError, Result};

/// Extension of persisted entry files
const ENTRY_EXTENSION: &str = "json";

// == File Backend ==
/// Durable store rooted at one directory.
///
/// The directory may be shared by several cache instances or processes;
/// concurrent writes to the same key are last-write-wins.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    // == Constructor ==
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the directory and any missing parents. Idempotent.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CacheError::io(format!("creating cache directory {}", self.dir.display()), e)
        })
    }

    /// Path of the file holding the entry for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key_digest(key), ENTRY_EXTENSION))
    }

    async fn read_entry(path: &Path) -> Result<Option<CacheEntry>> {
        let content = match fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading cache file {}", path.display()),
                    e,
                ))
            }
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    async fn remove_path(path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(
                format!("removing cache file {}", path.display()),
                e,
            )),
        }
    }

    /// Lists every path in the directory. A missing directory lists as empty.
    async fn list(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io("reading cache directory", e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io("reading cache directory entry", e))?
        {
            paths.push(entry.path());
        }
        Ok(paths)
    }
}

#[async_trait]
impl CacheBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Self::read_entry(&self.entry_path(key)).await
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(key);
        let content = serde_json::to_vec(entry)?;

        fs::write(&path, content)
            .await
            .map_err(|e| CacheError::io(format!("writing cache file {}", path.display()), e))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::remove_path(&self.entry_path(key)).await
    }

    // A failed removal does not stop the rest of the directory being cleared.
    async fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.list().await? {
            match Self::remove_path(&path).await {
                Ok(()) => removed += 1,
                Err(e) => debug!("Skipping cache file during clear: {}", e),
            }
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    async fn purge_expired(&self, policy: &ExpirationPolicy) -> Result<usize> {
        let mut removed = 0;
        for path in self.list().await? {
            if path.extension().map_or(true, |ext| ext != ENTRY_EXTENSION) {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(Some(entry)) if policy.is_expired(&entry) => {
                    if Self::remove_path(&path).await.is_ok() {
                        removed += 1;
                    }
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable cache file: {}", e),
            }
        }
        Ok(removed)
    }
}

// == Utility Functions ==
/// Hex-encoded SHA-256 digest of a cache key.
pub fn key_digest(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}
