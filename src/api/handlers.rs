//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::cache::{CacheTarget, Cacheable, Cached};
use crate::error::GatewayError;
use crate::models::{
    ClearResponse, ControlQuery, CssQuery, HealthResponse, NodesQuery, StatsResponse,
};
use crate::remote::DesignApi;
use crate::styles::export_css;

/// Application state shared across all handlers.
///
/// Holds the cached API view and a handle to the cache behind it.
#[derive(Clone)]
pub struct AppState {
    /// Design API with caching applied
    pub api: Arc<dyn DesignApi>,
    /// The cache used by `api`
    pub cache: Arc<Cacheable>,
}

impl AppState {
    /// Creates a new AppState from a cached API target.
    pub fn new<T>(api: Cached<T>) -> Self
    where
        T: DesignApi + CacheTarget + 'static,
    {
        let cache = api.cache_handle();
        Self {
            api: Arc::new(api),
            cache,
        }
    }
}

type GatewayResult<T> = Result<Json<T>, GatewayError>;

fn validate_key<'a>(kind: &str, key: &'a str) -> Result<&'a str, GatewayError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(GatewayError::InvalidRequest(format!("{} cannot be empty", kind)));
    }
    Ok(key)
}

/// Handler for GET /files/:file_key
pub async fn file_handler(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
    Query(query): Query<ControlQuery>,
) -> GatewayResult<Value> {
    let file_key = validate_key("File key", &file_key)?;
    let file = state.api.get_file(file_key, query.control()).await?;
    Ok(Json(file))
}

/// Handler for GET /files/:file_key/nodes
pub async fn file_nodes_handler(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
    Query(query): Query<NodesQuery>,
) -> GatewayResult<Value> {
    let file_key = validate_key("File key", &file_key)?;
    let nodes = state
        .api
        .get_file_nodes(file_key, query.ids(), query.control())
        .await?;
    Ok(Json(nodes))
}

/// Handler for GET /files/:file_key/styles
pub async fn file_styles_handler(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
    Query(query): Query<ControlQuery>,
) -> GatewayResult<Vec<Value>> {
    let file_key = validate_key("File key", &file_key)?;
    let styles = state.api.get_file_styles(file_key, query.control()).await?;
    Ok(Json(styles))
}

/// Handler for GET /files/:file_key/css
///
/// Renders the file's fill styles as a stylesheet. The file fetch goes
/// through the cache like `GET /files/:file_key`.
pub async fn file_css_handler(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
    Query(query): Query<CssQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let file_key = validate_key("File key", &file_key)?;
    let css = export_css(state.api.as_ref(), file_key, &query.filter(), query.control()).await?;
    Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css))
}

/// Handler for GET /styles/:style_key
pub async fn style_handler(
    State(state): State<AppState>,
    Path(style_key): Path<String>,
    Query(query): Query<ControlQuery>,
) -> GatewayResult<Value> {
    let style_key = validate_key("Style key", &style_key)?;
    let style = state.api.get_style(style_key, query.control()).await?;
    Ok(Json(style))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(state.cache.config().storage, &stats))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear().await;
    Json(ClearResponse::new(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheControl;
    use crate::config::CacheConfig;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Upstream stand-in that counts requests.
    #[derive(Default)]
    struct StubApi {
        requests: Arc<AtomicUsize>,
    }

    impl CacheTarget for StubApi {
        const OPERATIONS: &'static [&'static str] = crate::remote::DESIGN_API_OPERATIONS;
    }

    #[async_trait]
    impl DesignApi for StubApi {
        async fn get_file(
            &self,
            file_key: &str,
            _control: Option<CacheControl>,
        ) -> Result<Value, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"key": file_key}))
        }

        async fn get_file_nodes(
            &self,
            file_key: &str,
            ids: Option<&str>,
            _control: Option<CacheControl>,
        ) -> Result<Value, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"key": file_key, "ids": ids}))
        }

        async fn get_file_styles(
            &self,
            _file_key: &str,
            _control: Option<CacheControl>,
        ) -> Result<Vec<Value>, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(vec![json!({"name": "Primary"})])
        }

        async fn get_style(
            &self,
            style_key: &str,
            _control: Option<CacheControl>,
        ) -> Result<Value, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if style_key == "missing" {
                return Err(ApiError::Status {
                    status: 404,
                    body: "not found".to_string(),
                });
            }
            Ok(json!({"key": style_key}))
        }
    }

    fn test_state() -> (AppState, Arc<AtomicUsize>) {
        let stub = StubApi::default();
        let requests = stub.requests.clone();
        (AppState::new(Cached::wrap(stub, CacheConfig::default())), requests)
    }

    #[tokio::test]
    async fn test_file_handler_caches() {
        let (state, requests) = test_state();

        for _ in 0..2 {
            let response = file_handler(
                State(state.clone()),
                Path("abc".to_string()),
                Query(ControlQuery::default()),
            )
            .await
            .unwrap();
            assert_eq!(response.0, json!({"key": "abc"}));
        }

        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_file_handler_force() {
        let (state, requests) = test_state();

        file_handler(
            State(state.clone()),
            Path("abc".to_string()),
            Query(ControlQuery::default()),
        )
        .await
        .unwrap();
        let forced = ControlQuery {
            force: Some(true),
            ..Default::default()
        };
        file_handler(State(state.clone()), Path("abc".to_string()), Query(forced))
            .await
            .unwrap();

        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blank_key_is_invalid() {
        let (state, requests) = test_state();

        let result =
            style_handler(State(state), Path("  ".to_string()), Query(ControlQuery::default()))
                .await;

        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stats_and_clear_handlers() {
        let (state, _requests) = test_state();

        file_styles_handler(
            State(state.clone()),
            Path("abc".to_string()),
            Query(ControlQuery::default()),
        )
        .await
        .unwrap();

        let stats = stats_handler(State(state.clone())).await;
        assert_eq!(stats.memory_entries, 1);
        assert_eq!(stats.misses, 1);

        let cleared = clear_handler(State(state.clone())).await;
        assert_eq!(cleared.removed, 1);
        assert_eq!(stats_handler(State(state)).await.memory_entries, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
