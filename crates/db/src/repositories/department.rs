//! Department repository.

use chrono::Utc;
use hrms_core::organization::DepartmentInput;
use hrms_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::error::{RepositoryError, unique_violation};
use super::query::{ListParams, like};
use crate::entities::departments;

/// Sort keys accepted by [`DepartmentRepository::list`].
pub const DEPARTMENT_SORTS: &[&str] = &["name", "created_at"];

const DUPLICATE_NAME: &str = "The name has already been taken.";

/// Filter options for listing departments.
#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    /// Active flag.
    pub is_active: Option<bool>,
    /// Substring of name or description.
    pub search: Option<String>,
}

/// Department repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists departments.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown sort keys, or a database error.
    pub async fn list(
        &self,
        filter: &DepartmentFilter,
        params: &ListParams,
    ) -> Result<PageResponse<departments::Model>, RepositoryError> {
        let sort = params.sort_key(DEPARTMENT_SORTS, "name")?;

        let mut query = departments::Entity::find();
        if let Some(active) = filter.is_active {
            query = query.filter(departments::Column::IsActive.eq(active));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like(search);
            query = query.filter(
                Condition::any()
                    .add(departments::Column::Name.like(pattern.as_str()))
                    .add(departments::Column::Description.like(pattern.as_str())),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let column = match sort {
            "created_at" => departments::Column::CreatedAt,
            _ => departments::Column::Name,
        };
        let data = query
            .order_by(column, params.order())
            .order_by_asc(departments::Column::Id)
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, params.page, total))
    }

    /// Finds a department by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<departments::Model>, DbErr> {
        departments::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a department or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the department does not exist.
    pub async fn get(&self, id: i32) -> Result<departments::Model, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound("Department"))
    }

    async fn name_taken(&self, name: &str, except_id: Option<i32>) -> Result<bool, DbErr> {
        let mut query = departments::Entity::find().filter(departments::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(departments::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns a `name` validation error when the name is taken.
    pub async fn create(
        &self,
        input: DepartmentInput,
        actor: Option<i32>,
    ) -> Result<departments::Model, RepositoryError> {
        let name = input.name.unwrap_or_default();
        if self.name_taken(&name, None).await? {
            return Err(RepositoryError::field("name", DUPLICATE_NAME));
        }

        let now = Utc::now();
        let department = departments::ActiveModel {
            name: Set(name),
            description: Set(input.description),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_violation(e, "name", DUPLICATE_NAME))?;

        info!(department_id = department.id, name = %department.name, "Department created");
        Ok(department)
    }

    /// Updates a department.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `name` validation error.
    pub async fn update(
        &self,
        id: i32,
        input: DepartmentInput,
        actor: Option<i32>,
    ) -> Result<departments::Model, RepositoryError> {
        let existing = self.get(id).await?;
        let name = input.name.unwrap_or_default();
        if self.name_taken(&name, Some(id)).await? {
            return Err(RepositoryError::field("name", DUPLICATE_NAME));
        }

        let is_active = input.is_active.unwrap_or(existing.is_active);
        let mut model: departments::ActiveModel = existing.into();
        model.name = Set(name);
        model.description = Set(input.description);
        model.is_active = Set(is_active);
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let department = model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, "name", DUPLICATE_NAME))?;

        info!(department_id = id, "Department updated");
        Ok(department)
    }
}
