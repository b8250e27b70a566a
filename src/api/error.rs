//! API Error Types
//!
//! Defines error types for the HTTP layer and implements conversion
//! to responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::content::ContentError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Content store query failed
    #[error("Content store error: {0}")]
    Content(#[from] ContentError),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Content(ContentError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "CONTENT_STORE_TIMEOUT")
            }
            ApiError::Content(ContentError::Unavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONTENT_STORE_UNAVAILABLE")
            }
            ApiError::Content(_) => (StatusCode::BAD_GATEWAY, "CONTENT_STORE_ERROR"),
            ApiError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthorized("missing".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Content(ContentError::Timeout), StatusCode::GATEWAY_TIMEOUT),
            (
                ApiError::Content(ContentError::Unavailable),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Content(ContentError::Api {
                    status: 400,
                    message: "bad query".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (ApiError::Render("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
