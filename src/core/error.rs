use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Not-found error in the `<resource> not found (<field>=<value>)` shape.
    pub fn not_found(resource: &str, field: &str, value: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} not found ({}={})", resource, field, value))
    }

    /// Duplicate error raised when a uniqueness check fails.
    pub fn duplicate(resource: &str, field: &str, value: impl std::fmt::Display) -> Self {
        AppError::Conflict(format!("Duplicate {} ({}={})", resource, field, value))
    }

    /// Map a write error, turning constraint violations into `Conflict`.
    ///
    /// The unique indexes are the real guarantee behind the duplicate
    /// pre-checks, so a unique violation here means a concurrent write won.
    pub fn from_write(
        e: sqlx::Error,
        resource: &str,
        field: &str,
        value: impl std::fmt::Display,
    ) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                tracing::warn!(
                    "Unique constraint rejected {} with {}={}",
                    resource,
                    field,
                    value
                );
                return AppError::duplicate(resource, field, value);
            }
            if db_err.is_foreign_key_violation() {
                tracing::warn!("Foreign key constraint rejected write on {}", resource);
                return AppError::Conflict(format!(
                    "{} is still referenced by other records",
                    resource
                ));
            }
        }
        tracing::error!("Failed to write {}: {:?}", resource, e);
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::InvalidFile(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
