//! Remote Design-File API Module
//!
//! The expensive collaborator the cache was built for: read-only calls to a
//! design-file HTTP API.
//!
//! - [`DesignApi`] is the capability interface
//! - [`DesignClient`] talks to the real API over HTTP
//! - `Cached<T>` implements [`DesignApi`] for any cacheable target

mod cached;
mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::CacheControl;
use crate::error::ApiError;

pub use client::{DesignClient, TOKEN_HEADER};

/// Operation names of [`DesignApi`], used as cache key prefixes
pub const DESIGN_API_OPERATIONS: &[&str] =
    &["get_file", "get_file_nodes", "get_file_styles", "get_style"];

/// Read operations of the design-file API.
///
/// Each method takes a trailing per-call [`CacheControl`]. Implementations
/// that do not cache ignore it.
#[async_trait]
pub trait DesignApi: Send + Sync {
    /// Full document for a file
    async fn get_file(
        &self,
        file_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError>;

    /// Selected nodes of a file; `ids` is a comma-separated node id list
    async fn get_file_nodes(
        &self,
        file_key: &str,
        ids: Option<&str>,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError>;

    /// Published styles of a file
    async fn get_file_styles(
        &self,
        file_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Vec<Value>, ApiError>;

    /// Metadata of a single style
    async fn get_style(
        &self,
        style_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError>;
}
