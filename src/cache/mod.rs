//! Cache Module
//!
//! Read-through caching for async operations with memory, file, or tiered
//! storage and TTL expiration.

mod backend;
mod control;
mod entry;
mod facade;
mod file;
mod key;
mod memory;
mod policy;
mod stats;
mod storage;


// Re-export public types
pub use backend::CacheBackend;
pub use control::{CacheControl, ResolvedControl};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use facade::{CacheTarget, Cacheable, Cached};
pub use file::{key_digest, FileBackend};
pub use key::{CallArgs, JsonKeyDeriver, KeyDeriver};
pub use memory::MemoryBackend;
pub use policy::ExpirationPolicy;
pub use stats::{CacheCounters, CacheStats};
pub use storage::TieredStorage;
