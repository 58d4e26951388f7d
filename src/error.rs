use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{mailer::MailError, response::ApiResponse};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness clashes: taken seats, duplicate trip numbers, registered emails.
    #[error("{0}")]
    Conflict(String),

    #[error("Failed to send OTP")]
    Mail(#[from] MailError),

    #[error("Database error")]
    OrmError(#[from] DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorData {
    pub error: String,
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    /// Machine-readable reason carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_failed",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Mail(_) => "mail_failed",
            AppError::OrmError(err) => match classify_db_error(err) {
                DbErrorKind::NotFound => "not_found",
                DbErrorKind::Duplicate => "conflict",
                DbErrorKind::Other => "internal_error",
            },
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Mail(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OrmError(err) => match classify_db_error(err) {
                DbErrorKind::NotFound => StatusCode::NOT_FOUND,
                DbErrorKind::Duplicate => StatusCode::BAD_REQUEST,
                DbErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::OrmError(err) => match classify_db_error(err) {
                DbErrorKind::NotFound => "Record not found".to_string(),
                DbErrorKind::Duplicate => "Duplicate value".to_string(),
                DbErrorKind::Other => "Internal Server Error".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

enum DbErrorKind {
    NotFound,
    Duplicate,
    Other,
}

fn classify_db_error(err: &DbErr) -> DbErrorKind {
    if matches!(err, DbErr::RecordNotFound(_)) {
        return DbErrorKind::NotFound;
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DbErrorKind::Duplicate,
        _ => DbErrorKind::Other,
    }
}

/// True when the error is a unique-index violation raised by the database.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(classify_db_error(err), DbErrorKind::Duplicate)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::OrmError(err) if status.is_server_error() => {
                tracing::error!(error = %err, "database error");
            }
            AppError::Mail(err) => tracing::error!(error = %err, "mail delivery failed"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let body = ApiResponse::failure(
            self.public_message(),
            Some(ErrorData {
                error: self.code().to_string(),
            }),
        );

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_a_bad_request_with_its_own_code() {
        let err = AppError::Conflict("Some seats are already booked".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "conflict");
        assert_eq!(err.public_message(), "Some seats are already booked");
    }

    #[test]
    fn unknown_db_errors_hide_their_detail() {
        let err = AppError::from(DbErr::Custom("connection reset by peer".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn record_not_found_maps_to_404() {
        let err = AppError::from(DbErr::RecordNotFound("trip".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }
}
