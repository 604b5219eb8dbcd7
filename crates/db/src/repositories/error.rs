//! Errors shared by the CRUD repositories.

use hrms_shared::FieldErrors;
use sea_orm::{DbErr, SqlErr};

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Row does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input rejected by a rule that needs the database (uniqueness, references).
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Stored JSON could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FieldErrors> for RepositoryError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl RepositoryError {
    /// Single-field validation error.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

/// Maps a unique-constraint violation to a field error, passing other errors through.
///
/// Concurrent creates that slip past the pre-insert check end up here.
pub(crate) fn unique_violation(err: DbErr, field: &str, message: &str) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::field(field, message),
        _ => RepositoryError::Database(err),
    }
}
