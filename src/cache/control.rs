//! Per-call cache control.

use serde::{Deserialize, Serialize};

/// Overrides supplied by a caller for a single invocation.
///
/// Each field left as `None` falls back to the instance default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheControl {
    /// Consult and populate the cache for this call
    #[serde(default)]
    pub cache: Option<bool>,
    /// Evict any existing entry before executing
    #[serde(default)]
    pub force: Option<bool>,
}

impl CacheControl {
    /// Skip the cache entirely: no lookup, no write.
    pub fn bypass() -> Self {
        Self {
            cache: Some(false),
            force: None,
        }
    }

    /// Discard any existing entry and recompute, repopulating the cache.
    pub fn refresh() -> Self {
        Self {
            cache: None,
            force: Some(true),
        }
    }

    /// Fills unset fields from the instance defaults.
    pub fn resolve(&self, default_cache: bool, default_force: bool) -> ResolvedControl {
        ResolvedControl {
            cache: self.cache.unwrap_or(default_cache),
            force: self.force.unwrap_or(default_force),
        }
    }
}

/// Control values after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedControl {
    pub cache: bool,
    pub force: bool,
}
