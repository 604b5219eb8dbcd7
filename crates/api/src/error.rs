//! Mapping of domain and repository errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrms_core::auth::PasswordError;
use hrms_core::import::ImportError;
use hrms_db::{RepositoryError, SafeDeleteError};
use hrms_shared::{AppError, FieldErrors};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use crate::spreadsheet::SpreadsheetError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for every 500 response.
const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again later.";

/// An [`AppError`] that knows how to render itself as the failure envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 404 for a named resource.
    #[must_use]
    pub fn not_found(resource: &str) -> Self {
        Self(AppError::NotFound(format!("{resource} not found")))
    }

    /// 400 with a message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::BadRequest(message.into()))
    }

    /// HTTP status of the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            AppError::Validation(errors) => json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::Blocked { message, blockers } => json!({
                "success": false,
                "message": message,
                "blockers": blockers,
            }),
            AppError::Database(raw) | AppError::Internal(raw) => {
                error!(error = %raw, "Request failed");
                json!({
                    "success": false,
                    "message": GENERIC_FAILURE,
                    "error": raw,
                })
            }
            AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::PayloadTooLarge(message) => json!({
                "success": false,
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(AppError::Validation(errors))
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(resource) => Self::not_found(resource),
            RepositoryError::Validation(errors) => errors.into(),
            RepositoryError::Serialization(e) => Self(AppError::Internal(e.to_string())),
            RepositoryError::Database(e) => e.into(),
        }
    }
}

impl From<SafeDeleteError> for ApiError {
    fn from(err: SafeDeleteError) -> Self {
        match err {
            SafeDeleteError::NotFound(resource) => Self::not_found(resource),
            SafeDeleteError::ManifestNotFound => Self::not_found("Recycle bin entry"),
            SafeDeleteError::Blocked(blocked) => Self(AppError::Blocked {
                message: blocked.to_string(),
                blockers: blocked.messages(),
            }),
            SafeDeleteError::RestoreConflict(message) => {
                Self(AppError::field("deletion_key", format!("Cannot restore: {message}")))
            }
            SafeDeleteError::CorruptSnapshot(message) => Self(AppError::Internal(message)),
            SafeDeleteError::Serialization(e) => Self(AppError::Internal(e.to_string())),
            SafeDeleteError::Database(e) => e.into(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        Self(AppError::field("file", err.to_string()))
    }
}

impl From<SpreadsheetError> for ApiError {
    fn from(err: SpreadsheetError) -> Self {
        match err {
            SpreadsheetError::Unreadable(message) => {
                ImportError::Unreadable(message).into()
            }
            SpreadsheetError::Render(message) => Self(AppError::Internal(message)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}
