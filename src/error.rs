//! Error types for the query cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Remote Error ==
/// Failure reported by the upstream events API.
///
/// `message` is the human readable text the server put in its error body,
/// if any. `status` is absent when the request never got a response.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Remote request failed: {detail}")]
pub struct RemoteError {
    /// HTTP status returned by the server
    pub status: Option<u16>,
    /// Optional `message` field of the JSON error body
    pub message: Option<String>,
    /// What went wrong, for logs
    pub detail: String,
}

impl RemoteError {
    /// Error for a non-success HTTP response.
    pub fn http(status: u16, message: Option<String>) -> Self {
        Self {
            status: Some(status),
            detail: format!("server responded with status {}", status),
            message,
        }
    }

    /// Error for a request that failed before a response arrived.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            message: None,
            detail: detail.into(),
        }
    }

    /// Returns true if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Server message, or `fallback` when the server gave none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

// == Cache Error Enum ==
/// Unified error type for the query cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No value cached under the key
    #[error("Query not found: {0}")]
    NotFound(String),

    /// Key is empty, malformed or too long
    #[error("Invalid query key: {0}")]
    InvalidKey(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache is full and every entry is pinned by a pending mutation
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Upstream read or write failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status used when this error reaches a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::CacheFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Remote(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            CacheError::Remote(_) => StatusCode::BAD_GATEWAY,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == Screen Error ==
/// An error rendered the way a screen shows it: a title plus a message,
/// falling back to a fixed text when the server sent none.
#[derive(Debug)]
pub struct ScreenError {
    pub title: &'static str,
    pub fallback: &'static str,
    pub source: CacheError,
}

impl ScreenError {
    pub fn new(title: &'static str, fallback: &'static str, source: CacheError) -> Self {
        Self {
            title,
            fallback,
            source,
        }
    }

    /// Message shown to the user.
    pub fn message(&self) -> String {
        match &self.source {
            CacheError::Remote(err) => err.message_or(self.fallback).to_string(),
            CacheError::InvalidKey(msg) | CacheError::InvalidRequest(msg) => msg.clone(),
            _ => self.fallback.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::with_title(self.title, self.message());
        (self.source.status_code(), Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_fallback() {
        let err = RemoteError::http(500, None);
        assert_eq!(err.message_or("Failed to delete event."), "Failed to delete event.");

        let err = RemoteError::http(422, Some("Title is required".to_string()));
        assert_eq!(err.message_or("fallback"), "Title is required");
    }

    #[test]
    fn test_status_codes() {
        let not_found = CacheError::Remote(RemoteError::http(404, None));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let upstream = CacheError::Remote(RemoteError::transport("connection refused"));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);

        let bad_key = CacheError::InvalidKey("".to_string());
        assert_eq!(bad_key.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_screen_error_uses_fallback_for_local_errors() {
        let err = ScreenError::new(
            "An error occurred",
            "Failed to load event details.",
            CacheError::Internal("lock poisoned".to_string()),
        );
        assert_eq!(err.message(), "Failed to load event details.");
    }
}
