//! Error types for the cache and the caching gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures inside a storage backend.
///
/// These never reach the caller of a cached operation: the storage layer
/// logs them and degrades to a miss or a no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    /// File system failure
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisted record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

// == API Error Enum ==
/// Failures of the remote design-file API.
///
/// Propagated unchanged through the cache and never cached.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No access token was configured
    #[error("Design API access token is required")]
    MissingToken,

    /// Token contains characters that cannot be sent in a header
    #[error("Design API access token is not a valid header value")]
    InvalidToken,

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Design API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Upstream answered successfully but flagged the request as failed
    #[error("Design API rejected request: {0}")]
    Rejected(String),

    /// Upstream payload lacked an expected field
    #[error("Malformed response: {0}")]
    Malformed(String),
}

// == Gateway Error Enum ==
/// Errors surfaced by the HTTP gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The upstream design API call failed
    #[error(transparent)]
    Upstream(#[from] ApiError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::Upstream(ApiError::Status { status: 404, .. }) => StatusCode::NOT_FOUND,
            GatewayError::Upstream(ApiError::MissingToken | ApiError::InvalidToken) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for backend operations.
pub type Result<T> = std::result::Result<T, CacheError>;
