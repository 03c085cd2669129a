//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::error::ClinicError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingField(String),
    #[error("{0}")]
    EntityExists(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidDateTime(String),
    #[error("{0}")]
    VisitExists(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::MissingField(msg) => (StatusCode::BAD_REQUEST, "MISSING_FIELD", msg),
            ApiError::EntityExists(msg) => (StatusCode::BAD_REQUEST, "ENTITY_EXISTS", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::InvalidDateTime(msg) => (StatusCode::BAD_REQUEST, "INVALID_DATE_TIME", msg),
            ApiError::VisitExists(msg) => (StatusCode::BAD_REQUEST, "VISIT_EXISTS", msg),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        match err {
            ClinicError::MissingField(msg) => ApiError::MissingField(msg),
            ClinicError::EntityExists(msg) => ApiError::EntityExists(msg),
            ClinicError::EntityDoesNotExist(msg) => ApiError::NotFound(msg),
            ClinicError::InvalidDateTime(msg) => ApiError::InvalidDateTime(msg),
            ClinicError::VisitExists(msg) => ApiError::VisitExists(msg),
            ClinicError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}
