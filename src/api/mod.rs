//! API Module
//!
//! HTTP handlers and routing for the caching gateway.
//!
//! # Endpoints
//! - `GET /files/:file_key` - Cached file document
//! - `GET /files/:file_key/nodes` - Cached file nodes (`?ids=`)
//! - `GET /files/:file_key/styles` - Cached file styles
//! - `GET /files/:file_key/css` - Fill styles as CSS (`?type=&name=&prefix=`)
//! - `GET /styles/:style_key` - Cached style metadata
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint
//!
//! Read endpoints accept `?cache=<bool>&force=<bool>` per request.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
