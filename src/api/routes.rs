//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, file_css_handler, file_handler, file_nodes_handler, file_styles_handler,
    health_handler, stats_handler, style_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /files/:file_key` - Cached file document
/// - `GET /files/:file_key/nodes` - Cached file nodes
/// - `GET /files/:file_key/styles` - Cached file styles
/// - `GET /files/:file_key/css` - Fill styles exported as CSS
/// - `GET /styles/:style_key` - Cached style metadata
/// - `GET /stats` - Cache statistics
/// - `DELETE /cache` - Clear the cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/files/:file_key", get(file_handler))
        .route("/files/:file_key/nodes", get(file_nodes_handler))
        .route("/files/:file_key/styles", get(file_styles_handler))
        .route("/files/:file_key/css", get(file_css_handler))
        .route("/styles/:style_key", get(style_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
