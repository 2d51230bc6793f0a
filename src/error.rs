use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::scheduling::{Conflict, IntervalError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(Conflict),

    #[error("{0}")]
    Uniqueness(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Turns a unique-constraint violation into [`AppError::Uniqueness`], passing
    /// every other storage fault through unchanged.
    pub fn unique(err: sqlx::Error, msg: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return AppError::Uniqueness(msg.to_string());
            }
        }
        AppError::Database(err)
    }

    /// Turns a foreign-key violation on delete into a validation error.
    pub fn in_use(err: sqlx::Error, msg: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() {
                return AppError::Validation(msg.to_string());
            }
        }
        AppError::Database(err)
    }
}

impl From<IntervalError> for AppError {
    fn from(err: IntervalError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_booking: Option<Conflict>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message, conflicting_booking) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFoundError", msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "ValidationError", msg, None),
            AppError::Uniqueness(msg) => (StatusCode::CONFLICT, "UniquenessError", msg, None),
            AppError::Conflict(conflict) => (
                StatusCode::CONFLICT,
                "ConflictError",
                conflict.to_string(),
                Some(conflict),
            ),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "StorageError",
                    "Database error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message,
            conflicting_booking,
        });

        (status, body).into_response()
    }
}
