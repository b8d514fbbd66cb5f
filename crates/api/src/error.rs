//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type.
///
/// Every handler returns `Result<_, AppError>`; the `IntoResponse` impl maps
/// each variant to a status code and a JSON `{"message": ...}` body. Internal
/// failures are logged with their cause and reported to the client with a
/// generic message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown account or wrong password. Collapsed into a single variant so
    /// responses don't reveal whether the email exists.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, invalid, or expired bearer token.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but lacking the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness conflict (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is well-formed but not permitted (e.g. admin self-deletion).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Storage is not available (pool exhausted or closed).
    #[error("Service unavailable")]
    Unavailable,

    /// Unexpected storage or runtime failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Database(
                e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed),
            ) => {
                tracing::warn!(error = %e, "storage pool unavailable");
                Self::Unavailable
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let status = match &self {
            Self::Validation(_)
            | Self::InvalidCredentials
            | Self::Conflict(_)
            | Self::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Unavailable => "Service unavailable".to_owned(),
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::InvalidOperation(msg)
            | Self::NotFound(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::InvalidCredentials => "Invalid credentials".to_owned(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
