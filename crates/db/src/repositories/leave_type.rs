//! Leave type repository.

use chrono::Utc;
use hrms_core::leave::LeaveTypeInput;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::error::{RepositoryError, unique_violation};
use crate::entities::leave_types;

const DUPLICATE_NAME: &str = "The name has already been taken.";

/// Leave type repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct LeaveTypeRepository {
    db: DatabaseConnection,
}

impl LeaveTypeRepository {
    /// Creates a new leave type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All leave types by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<leave_types::Model>, DbErr> {
        leave_types::Entity::find()
            .order_by_asc(leave_types::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a leave type by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<leave_types::Model>, DbErr> {
        leave_types::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a leave type or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the leave type does not exist.
    pub async fn get(&self, id: i32) -> Result<leave_types::Model, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound("Leave type"))
    }

    async fn name_taken(&self, name: &str, except_id: Option<i32>) -> Result<bool, DbErr> {
        let mut query = leave_types::Entity::find().filter(leave_types::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(leave_types::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a leave type.
    ///
    /// # Errors
    ///
    /// Returns a `name` validation error when the name is taken.
    pub async fn create(
        &self,
        input: LeaveTypeInput,
        actor: Option<i32>,
    ) -> Result<leave_types::Model, RepositoryError> {
        let name = input.name.unwrap_or_default();
        if self.name_taken(&name, None).await? {
            return Err(RepositoryError::field("name", DUPLICATE_NAME));
        }

        let now = Utc::now();
        let leave_type = leave_types::ActiveModel {
            name: Set(name),
            default_duration: Set(input.default_duration.unwrap_or_default()),
            description: Set(input.description),
            requires_attachment: Set(input.requires_attachment.unwrap_or(false)),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE_NAME))?;

        info!(leave_type_id = leave_type.id, name = %leave_type.name, "Leave type created");
        Ok(leave_type)
    }

    /// Updates a leave type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `name` validation error.
    pub async fn update(
        &self,
        id: i32,
        input: LeaveTypeInput,
        actor: Option<i32>,
    ) -> Result<leave_types::Model, RepositoryError> {
        let existing = self.get(id).await?;
        let name = input.name.unwrap_or_default();
        if self.name_taken(&name, Some(id)).await? {
            return Err(RepositoryError::field("name", DUPLICATE_NAME));
        }

        let default_duration = input.default_duration.unwrap_or(existing.default_duration);
        let requires_attachment = input
            .requires_attachment
            .unwrap_or(existing.requires_attachment);
        let mut model: leave_types::ActiveModel = existing.into();
        model.name = Set(name);
        model.default_duration = Set(default_duration);
        model.description = Set(input.description);
        model.requires_attachment = Set(requires_attachment);
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let leave_type = model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, "name", DUPLICATE_NAME))?;

        info!(leave_type_id = id, "Leave type updated");
        Ok(leave_type)
    }
}
