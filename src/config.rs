//! Configuration Module
//!
//! Cache options and the gateway's environment-driven settings.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::KeyDeriver;

/// Default upstream for the design-file API
pub const DEFAULT_API_BASE_URL: &str = "https://api.figma.com/v1";

/// TTL the gateway applies when none is configured (one hour)
pub const DEFAULT_GATEWAY_TTL_MS: u64 = 60 * 60 * 1000;

// == Storage Mode ==
/// Where a cache instance keeps its entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// In-process map only
    #[default]
    Memory,
    /// Files in the cache directory only
    File,
    /// Memory in front of files
    Both,
}

impl StorageMode {
    pub fn uses_memory(self) -> bool {
        matches!(self, StorageMode::Memory | StorageMode::Both)
    }

    pub fn uses_file(self) -> bool {
        matches!(self, StorageMode::File | StorageMode::Both)
    }
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageMode::Memory),
            "file" => Ok(StorageMode::File),
            "both" => Ok(StorageMode::Both),
            other => Err(format!("unknown storage mode '{}'", other)),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageMode::Memory => "memory",
            StorageMode::File => "file",
            StorageMode::Both => "both",
        };
        f.write_str(name)
    }
}

// == Cache Config ==
/// Options for one cache instance, fixed once the cache is built.
#[derive(Clone)]
pub struct CacheConfig {
    /// Allow-list of operation names; empty allows every operation
    pub include: Vec<String>,
    /// Operation names never cached; wins over `include`
    pub exclude: Vec<String>,
    /// Custom key derivation; `None` uses [`JsonKeyDeriver`](crate::cache::JsonKeyDeriver)
    pub key_deriver: Option<Arc<dyn KeyDeriver>>,
    /// Default for consulting and populating the cache
    pub cache: bool,
    /// Default for evicting before executing
    pub force: bool,
    /// Backend selection
    pub storage: StorageMode,
    /// Directory for the file backend
    pub cache_dir: PathBuf,
    /// Entry lifetime; `None` means entries never expire
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Loads cache options from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - Default cache flag (default: true)
    /// - `CACHE_FORCE` - Default force flag (default: false)
    /// - `CACHE_STORAGE` - memory, file, or both (default: memory)
    /// - `CACHE_DIR` - File backend directory (default: `<tmp>/cacheable`)
    /// - `CACHE_TTL_MS` - TTL in milliseconds, 0 for none (default: none)
    /// - `CACHE_INCLUDE` / `CACHE_EXCLUDE` - Comma-separated operation names
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            include: env_list("CACHE_INCLUDE"),
            exclude: env_list("CACHE_EXCLUDE"),
            key_deriver: None,
            cache: env_parse("CACHE_ENABLED").unwrap_or(defaults.cache),
            force: env_parse("CACHE_FORCE").unwrap_or(defaults.force),
            storage: env_parse("CACHE_STORAGE").unwrap_or(defaults.storage),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            ttl: env_parse::<u64>("CACHE_TTL_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }

    pub fn with_storage(mut self, storage: StorageMode) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Sets the expiration window. A zero TTL disables expiration.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    pub fn with_key_deriver(mut self, deriver: impl KeyDeriver + 'static) -> Self {
        self.key_deriver = Some(Arc::new(deriver));
        self
    }

    pub fn include<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(operations.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(operations.into_iter().map(Into::into));
        self
    }

    pub fn cache_by_default(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn force_by_default(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Whether include/exclude allow caching `operation`.
    pub fn allows(&self, operation: &str) -> bool {
        if self.exclude.iter().any(|name| name == operation) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|name| name == operation)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            key_deriver: None,
            cache: true,
            force: false,
            storage: StorageMode::Memory,
            cache_dir: default_cache_dir(),
            ttl: None,
        }
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("key_deriver", &self.key_deriver.as_ref().map(|_| "custom"))
            .field("cache", &self.cache)
            .field("force", &self.force)
            .field("storage", &self.storage)
            .field("cache_dir", &self.cache_dir)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Default file backend directory: `cacheable` under the system temp dir.
pub fn default_cache_dir() -> PathBuf {
    env::temp_dir().join("cacheable")
}

// == Gateway Config ==
/// Settings for the caching gateway binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream design-file API
    pub api_base_url: String,
    /// Access token sent to the upstream API
    pub api_token: Option<String>,
    /// Seconds between expired-entry sweeps; 0 disables the sweep
    pub purge_interval: u64,
    /// Cache options for the wrapped API client
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DESIGN_API_URL` - Upstream base URL (default: Figma v1 API)
    /// - `DESIGN_API_TOKEN` - Upstream access token
    /// - `PURGE_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - plus every variable read by [`CacheConfig::from_env`]; the TTL
    ///   defaults to one hour when `CACHE_TTL_MS` is unset
    pub fn from_env() -> Self {
        let mut cache = CacheConfig::from_env();
        if env::var("CACHE_TTL_MS").is_err() {
            cache.ttl = Some(Duration::from_millis(DEFAULT_GATEWAY_TTL_MS));
        }

        Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(3000),
            api_base_url: env::var("DESIGN_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_token: env::var("DESIGN_API_TOKEN").ok().filter(|v| !v.is_empty()),
            purge_interval: env_parse("PURGE_INTERVAL").unwrap_or(60),
            cache,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            purge_interval: 60,
            cache: CacheConfig::default()
                .with_ttl(Duration::from_millis(DEFAULT_GATEWAY_TTL_MS)),
        }
    }
}

// == Utility Functions ==
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
