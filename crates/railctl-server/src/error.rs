//! API Error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use railctl_planner::PlannerError;
use railctl_store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut detail = None;
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Store(e) => match e {
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                StoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                StoreError::InvalidTarget(msg) => (StatusCode::BAD_REQUEST, "INVALID_TARGET", msg),
                StoreError::AmbiguousPrefix { .. } => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string())
                }
                StoreError::LockConflict(_) => {
                    tracing::warn!(error = %e, "decision is locked by another writer");
                    (StatusCode::CONFLICT, "LOCK_CONFLICT", e.to_string())
                }
                other => {
                    tracing::error!(error = %other, "store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", other.to_string())
                }
            },
            ApiError::Planner(e) => match e {
                PlannerError::NotConfigured => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "AI_NOT_CONFIGURED", e.to_string())
                }
                PlannerError::Upstream { status, body } => {
                    tracing::error!(upstream_status = status, "model upstream failed");
                    detail = Some(body);
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", "Gemini error".to_string())
                }
                other => {
                    tracing::error!(error = %other, "AI plan failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "AI_PLAN_FAILED", other.to_string())
                }
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
