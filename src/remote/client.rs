//! HTTP client for the design-file API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheControl, CacheTarget};
use crate::error::ApiError;
use crate::remote::{DesignApi, DESIGN_API_OPERATIONS};

/// Header carrying the personal access token
pub const TOKEN_HEADER: &str = "X-Figma-Token";

/// Uncached reqwest-backed implementation of [`DesignApi`].
#[derive(Debug, Clone)]
pub struct DesignClient {
    http: reqwest::Client,
    base_url: String,
}

impl DesignClient {
    /// Creates a client for `base_url` authenticating with `token`.
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, ApiError> {
        if token.is_empty() {
            return Err(ApiError::MissingToken);
        }

        let mut token_value = HeaderValue::from_str(token).map_err(|_| ApiError::InvalidToken)?;
        token_value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetches a style endpoint and returns its `meta` object.
    async fn get_meta(&self, path: &str, failure: &str) -> Result<Value, ApiError> {
        let mut body = self.get_json(path, &[]).await?;
        if body.get("error").and_then(Value::as_bool) == Some(true) {
            return Err(ApiError::Rejected(failure.to_string()));
        }
        body.get_mut("meta")
            .map(Value::take)
            .ok_or_else(|| ApiError::Malformed(format!("{} has no meta", path)))
    }
}

impl CacheTarget for DesignClient {
    const OPERATIONS: &'static [&'static str] = DESIGN_API_OPERATIONS;
}

#[async_trait]
impl DesignApi for DesignClient {
    async fn get_file(
        &self,
        file_key: &str,
        _control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        self.get_json(&format!("/files/{}", file_key), &[]).await
    }

    async fn get_file_nodes(
        &self,
        file_key: &str,
        ids: Option<&str>,
        _control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        let query: Vec<(&str, &str)> = ids.map(|ids| ("ids", ids)).into_iter().collect();
        self.get_json(&format!("/files/{}/nodes", file_key), &query).await
    }

    async fn get_file_styles(
        &self,
        file_key: &str,
        _control: Option<CacheControl>,
    ) -> Result<Vec<Value>, ApiError> {
        let path = format!("/files/{}/styles", file_key);
        let mut meta = self.get_meta(&path, "failed to fetch file styles").await?;
        match meta.get_mut("styles").map(Value::take) {
            Some(Value::Array(styles)) => Ok(styles),
            _ => Err(ApiError::Malformed(format!("{} has no style list", path))),
        }
    }

    async fn get_style(
        &self,
        style_key: &str,
        _control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        self.get_meta(&format!("/styles/{}", style_key), "failed to fetch style").await
    }
}
