//! Expiration Policy Module
//!
//! Decides whether a cache entry is still live based on a per-instance TTL.

use std::time::Duration;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};

// == Expiration Policy ==
/// TTL applied uniformly to every entry of one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl: Option<Duration>,
}

impl ExpirationPolicy {
    /// Creates a policy; `None` or a zero TTL means entries never expire.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
        }
    }

    /// A policy under which nothing ever expires.
    pub fn never() -> Self {
        Self { ttl: None }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    // == Is Expired ==
    /// Checks an entry against the current wall clock.
    pub fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.is_expired_at(entry, current_timestamp_ms())
    }

    /// Checks an entry against an explicit `now` (Unix milliseconds).
    ///
    /// Boundary condition: an entry is expired once its age is greater than
    /// or equal to the TTL, so a read at exactly `timestamp + ttl` misses.
    pub fn is_expired_at(&self, entry: &CacheEntry, now: u64) -> bool {
        match self.ttl {
            Some(ttl) => u128::from(entry.age_ms(now)) >= ttl.as_millis(),
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_ttl_never_expires() {
        let policy = ExpirationPolicy::never();
        let entry = CacheEntry::with_timestamp(json!(1), 0);

        assert!(!policy.is_expired_at(&entry, u64::MAX));
    }

    #[test]
    fn test_live_before_ttl() {
        let policy = ExpirationPolicy::new(Some(Duration::from_millis(1000)));
        let entry = CacheEntry::with_timestamp(json!(1), 10_000);

        assert!(!policy.is_expired_at(&entry, 10_999));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let policy = ExpirationPolicy::new(Some(Duration::from_millis(1000)));
        let entry = CacheEntry::with_timestamp(json!(1), 10_000);

        assert!(policy.is_expired_at(&entry, 11_000), "Entry should be expired at boundary");
        assert!(policy.is_expired_at(&entry, 11_100));
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let policy = ExpirationPolicy::new(Some(Duration::ZERO));
        let entry = CacheEntry::with_timestamp(json!(1), 0);

        assert_eq!(policy.ttl(), None);
        assert!(!policy.is_expired_at(&entry, u64::MAX));
    }

    #[test]
    fn test_future_timestamp_is_live() {
        let policy = ExpirationPolicy::new(Some(Duration::from_millis(10)));
        let entry = CacheEntry::with_timestamp(json!(1), 50_000);

        assert!(!policy.is_expired_at(&entry, 40_000));
    }
}
