//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use files_core::error::{AppError, ErrorKind};

/// Message returned in place of any collaborator failure.
pub const SERVER_ERROR: &str = "Server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingField | ErrorKind::Validation | ErrorKind::Conflict => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Storage
        | ErrorKind::Queue
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);
        let message = if err.kind.is_client_error() {
            err.message
        } else {
            let cause = std::error::Error::source(&err).map(ToString::to_string);
            tracing::error!(kind = %err.kind, error = %err.message, cause, "Server error");
            SERVER_ERROR.to_string()
        };

        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Response wrapper for [`AppError`], the error type of every handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Result type of every handler.
pub type ApiResult<T> = Result<T, ApiError>;
