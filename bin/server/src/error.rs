//! HTTP error taxonomy for API handlers.
//!
//! Authorization and validation failures are detected at the boundary and
//! returned immediately; upstream failures are logged with their detail and
//! surfaced as opaque 5xx responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsroom_access::AccessError;
use serde_json::json;
use std::fmt;

/// Errors surfaced by API handlers, mapped one-to-one onto status codes.
#[derive(Debug)]
pub enum ApiError {
    /// No valid session identity (401).
    Unauthenticated,
    /// Authenticated but lacking the required role (403).
    Forbidden(String),
    /// Malformed or empty input (400).
    Validation(String),
    /// Referenced resource absent (404).
    NotFound,
    /// Identity provider or external API unreachable or erroring (502).
    Upstream(String),
    /// Anything else, including store failures (500).
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            Self::Validation(msg) => write!(f, "invalid request: {msg}"),
            Self::NotFound => write!(f, "not found"),
            Self::Upstream(msg) => write!(f, "upstream failure: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "not authenticated".to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            Self::Upstream(msg) => {
                tracing::error!("upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "upstream service failed".to_string())
            }
            Self::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotAuthenticated => Self::Unauthenticated,
            AccessError::InsufficientRole { .. } => Self::Forbidden(err.to_string()),
            AccessError::MissingClaim { .. } => Self::Upstream(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_access::Role;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::Forbidden("no".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Upstream("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn upstream_detail_is_not_leaked() {
        let response = ApiError::Upstream("secret connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        // The body carries a generic message; the detail goes to the log only.
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = String::from_utf8(bytes.to_vec()).expect("utf8 body");
        assert!(!body.contains("secret connection string"));
        assert!(body.contains("upstream service failed"));
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let response = ApiError::Internal("password=hunter2".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = String::from_utf8(bytes.to_vec()).expect("utf8 body");
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn access_errors_convert_with_distinct_statuses() {
        assert_eq!(
            status_of(AccessError::NotAuthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(
                AccessError::InsufficientRole {
                    required: Role::Moderator
                }
                .into()
            ),
            StatusCode::FORBIDDEN
        );
    }
}
