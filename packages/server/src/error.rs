use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::import::ImportRejection;
use sea_orm::DbErr;
use serde::Serialize;

use crate::models::import::RejectionDetails;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `IMPORT_REJECTED`,
    /// `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `NOT_FOUND`,
    /// `DUPLICATE_RECORD`, `PERSISTENCE_CONFLICT`, `SERVICE_BUSY`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "National ID must contain exactly 12 digits, got 10")]
    pub message: String,
    /// Rule, row and values behind an `IMPORT_REJECTED` error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<RejectionDetails>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// A bulk import failed validation; nothing was inserted.
    ImportRejected(ImportRejection),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    NotFound(String),
    /// The record collides with another record in the roster snapshot.
    Duplicate(String),
    /// The database refused a write that passed validation, e.g. because a
    /// concurrent session inserted the same identifiers first.
    Conflict(String),
    /// The database is unreachable or too slow. Safe to retry.
    ServiceBusy,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::ImportRejected(rejection) => (
                StatusCode::BAD_REQUEST,
                "IMPORT_REJECTED",
                rejection.to_string(),
                Some(RejectionDetails::from(&rejection)),
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MISSING",
                "Authentication required".into(),
                None,
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Invalid or expired token".into(),
                None,
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".into(),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, "DUPLICATE_RECORD", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "PERSISTENCE_CONFLICT", msg, None),
            AppError::ServiceBusy => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_BUSY",
                "The service is busy, please try again".into(),
                None,
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                    None,
                )
            }
        };

        (
            status,
            ErrorBody {
                code,
                message,
                details,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(e) => {
                tracing::warn!("Database connection unavailable: {e}");
                AppError::ServiceBusy
            }
            DbErr::Conn(e) => {
                tracing::warn!("Database connection error: {e}");
                AppError::ServiceBusy
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
