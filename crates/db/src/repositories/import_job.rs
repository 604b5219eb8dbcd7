//! Status records for queued imports.

use chrono::Utc;
use hrms_core::import::{ImportJobStatus, ImportReport};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::import_jobs;

/// Import job repository.
#[derive(Debug, Clone)]
pub struct ImportJobRepository {
    db: DatabaseConnection,
}

impl ImportJobRepository {
    /// Creates a new import job repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a queued import and returns it with a fresh `import_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        file_name: &str,
        total_rows: usize,
        actor: Option<i32>,
    ) -> Result<import_jobs::Model, DbErr> {
        let now = Utc::now();
        import_jobs::ActiveModel {
            import_id: Set(Uuid::new_v4().to_string()),
            file_name: Set(file_name.to_string()),
            status: Set(ImportJobStatus::Queued.as_str().to_string()),
            total_rows: Set(i32::try_from(total_rows).unwrap_or(i32::MAX)),
            processed_count: Set(0),
            imported_count: Set(0),
            errors: Set(serde_json::json!([])),
            warnings: Set(serde_json::json!([])),
            message: Set(None),
            created_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Finds a job by its public id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no job has that id.
    pub async fn find(&self, import_id: &str) -> Result<import_jobs::Model, RepositoryError> {
        import_jobs::Entity::find()
            .filter(import_jobs::Column::ImportId.eq(import_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound("Import"))
    }

    async fn set_status(
        &self,
        import_id: &str,
        status: ImportJobStatus,
        apply: impl FnOnce(&mut import_jobs::ActiveModel) -> Result<(), serde_json::Error>,
    ) -> Result<import_jobs::Model, RepositoryError> {
        let mut model: import_jobs::ActiveModel = self.find(import_id).await?.into();
        model.status = Set(status.as_str().to_string());
        model.updated_at = Set(Utc::now());
        apply(&mut model)?;
        Ok(model.update(&self.db).await?)
    }

    /// Marks a job as picked up by the worker.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn mark_processing(
        &self,
        import_id: &str,
    ) -> Result<import_jobs::Model, RepositoryError> {
        self.set_status(import_id, ImportJobStatus::Processing, |_| Ok(()))
            .await
    }

    /// Stores the final report.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn complete(
        &self,
        import_id: &str,
        report: &ImportReport,
    ) -> Result<import_jobs::Model, RepositoryError> {
        self.set_status(import_id, ImportJobStatus::Completed, |model| {
            model.processed_count = Set(i32::try_from(report.processed_count).unwrap_or(i32::MAX));
            model.imported_count = Set(i32::try_from(report.imported_count).unwrap_or(i32::MAX));
            model.errors = Set(serde_json::to_value(&report.errors)?);
            model.warnings = Set(serde_json::to_value(&report.warnings)?);
            model.message = Set(Some(report.summary()));
            Ok(())
        })
        .await
    }

    /// Marks a job failed with a reason.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn fail(
        &self,
        import_id: &str,
        message: &str,
    ) -> Result<import_jobs::Model, RepositoryError> {
        self.set_status(import_id, ImportJobStatus::Failed, |model| {
            model.message = Set(Some(message.to_string()));
            Ok(())
        })
        .await
    }

    /// Fails every job still queued or processing.
    ///
    /// Queued work lives in memory, so after a restart nothing will pick
    /// these jobs up again. Returns how many were failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn fail_unfinished(&self, message: &str) -> Result<u64, DbErr> {
        let unfinished = [
            ImportJobStatus::Queued.as_str(),
            ImportJobStatus::Processing.as_str(),
        ];
        let result = import_jobs::Entity::update_many()
            .col_expr(
                import_jobs::Column::Status,
                Expr::value(ImportJobStatus::Failed.as_str()),
            )
            .col_expr(import_jobs::Column::Message, Expr::value(message))
            .col_expr(import_jobs::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(import_jobs::Column::Status.is_in(unfinished))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
