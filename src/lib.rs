//! Cacheable - A transparent read-through cache for expensive async calls
//!
//! Memoizes results per operation and arguments in memory, on disk, or both,
//! with TTL expiration and per-call force/bypass control. Ships with a
//! caching gateway in front of a remote design-file API, including a CSS
//! export of a file's fill styles.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod styles;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheControl, CacheTarget, Cacheable, Cached};
pub use config::{CacheConfig, Config, StorageMode};
pub use tasks::spawn_purge_task;
