//! Position repository, including reporting-line checks.

use chrono::Utc;
use hrms_core::organization::{PositionInput, PositionNode, check_reports_to};
use hrms_shared::FieldErrors;
use hrms_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use tracing::info;

use super::error::RepositoryError;
use super::query::ListParams;
use crate::entities::{departments, positions};

/// Sort keys accepted by [`PositionRepository::list`].
pub const POSITION_SORTS: &[&str] = &["title", "level", "created_at", "department"];

/// Filter options for listing positions.
#[derive(Debug, Clone, Default)]
pub struct PositionFilter {
    /// Owning department.
    pub department_id: Option<i32>,
    /// Manager flag.
    pub is_manager: Option<bool>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// A position with its department, manager and direct reports.
#[derive(Debug, Clone, Serialize)]
pub struct PositionDetails {
    /// Position row.
    #[serde(flatten)]
    pub position: positions::Model,
    /// Owning department.
    pub department: Option<departments::Model>,
    /// Position this one reports to.
    pub reports_to: Option<positions::Model>,
    /// Positions reporting directly to this one.
    pub subordinates: Vec<positions::Model>,
}

/// Position repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PositionRepository {
    db: DatabaseConnection,
}

impl PositionRepository {
    /// Creates a new position repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists positions.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown sort keys, or a database error.
    pub async fn list(
        &self,
        filter: &PositionFilter,
        params: &ListParams,
    ) -> Result<PageResponse<positions::Model>, RepositoryError> {
        let sort = params.sort_key(POSITION_SORTS, "title")?;

        let mut query = positions::Entity::find();
        if let Some(department_id) = filter.department_id {
            query = query.filter(positions::Column::DepartmentId.eq(department_id));
        }
        if let Some(is_manager) = filter.is_manager {
            query = query.filter(positions::Column::IsManager.eq(is_manager));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(positions::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(&self.db).await?;

        query = match sort {
            "department" => query
                .join(JoinType::InnerJoin, positions::Relation::Department.def())
                .order_by(departments::Column::Name, params.order()),
            "level" => query.order_by(positions::Column::Level, params.order()),
            "created_at" => query.order_by(positions::Column::CreatedAt, params.order()),
            _ => query.order_by(positions::Column::Title, params.order()),
        };
        let data = query
            .order_by_asc(positions::Column::Id)
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, params.page, total))
    }

    /// Finds a position by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<positions::Model>, DbErr> {
        positions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a position or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the position does not exist.
    pub async fn get(&self, id: i32) -> Result<positions::Model, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound("Position"))
    }

    /// Loads a position with its department, manager and direct reports.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the position does not exist.
    pub async fn find_details(&self, id: i32) -> Result<PositionDetails, RepositoryError> {
        let position = self.get(id).await?;
        let department = departments::Entity::find_by_id(position.department_id)
            .one(&self.db)
            .await?;
        let reports_to = match position.reports_to_id {
            Some(manager_id) => self.find_by_id(manager_id).await?,
            None => None,
        };
        let subordinates = positions::Entity::find()
            .filter(positions::Column::ReportsToId.eq(id))
            .order_by_asc(positions::Column::Title)
            .all(&self.db)
            .await?;

        Ok(PositionDetails {
            position,
            department,
            reports_to,
            subordinates,
        })
    }

    /// Rejects unknown departments and invalid reporting lines.
    async fn check_placement(
        &self,
        position_id: Option<i32>,
        input: &PositionInput,
    ) -> Result<(), RepositoryError> {
        let department_id = input.department_id.unwrap_or_default();
        if departments::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::field(
                "department_id",
                "The selected department id is invalid.",
            ));
        }

        let Some(manager_id) = input.reports_to_id else {
            return Ok(());
        };
        let mut nodes: Vec<PositionNode> = positions::Entity::find()
            .filter(positions::Column::DepartmentId.eq(department_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| PositionNode {
                id: p.id,
                department_id: p.department_id,
                reports_to_id: p.reports_to_id,
            })
            .collect();
        // A manager from another department still needs a node to report the mismatch.
        if !nodes.iter().any(|n| n.id == manager_id)
            && let Some(manager) = self.find_by_id(manager_id).await?
        {
            nodes.push(PositionNode {
                id: manager.id,
                department_id: manager.department_id,
                reports_to_id: manager.reports_to_id,
            });
        }
        check_reports_to(position_id, department_id, manager_id, &nodes).map_err(FieldErrors::from)?;
        Ok(())
    }

    /// Creates a position.
    ///
    /// # Errors
    ///
    /// Returns validation errors for the department or reporting line.
    pub async fn create(
        &self,
        input: PositionInput,
        actor: Option<i32>,
    ) -> Result<positions::Model, RepositoryError> {
        self.check_placement(None, &input).await?;

        let now = Utc::now();
        let position = positions::ActiveModel {
            title: Set(input.title.unwrap_or_default()),
            department_id: Set(input.department_id.unwrap_or_default()),
            reports_to_id: Set(input.reports_to_id),
            level: Set(input.level.unwrap_or(1)),
            is_manager: Set(input.is_manager.unwrap_or(false)),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(position_id = position.id, title = %position.title, "Position created");
        Ok(position)
    }

    /// Updates a position.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or validation errors for the department or
    /// reporting line.
    pub async fn update(
        &self,
        id: i32,
        input: PositionInput,
        actor: Option<i32>,
    ) -> Result<positions::Model, RepositoryError> {
        let existing = self.get(id).await?;
        self.check_placement(Some(id), &input).await?;

        let level = input.level.unwrap_or(existing.level);
        let is_manager = input.is_manager.unwrap_or(existing.is_manager);
        let is_active = input.is_active.unwrap_or(existing.is_active);
        let mut model: positions::ActiveModel = existing.into();
        model.title = Set(input.title.unwrap_or_default());
        model.department_id = Set(input.department_id.unwrap_or_default());
        model.reports_to_id = Set(input.reports_to_id);
        model.level = Set(level);
        model.is_manager = Set(is_manager);
        model.is_active = Set(is_active);
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let position = model.update(&self.db).await?;

        info!(position_id = id, "Position updated");
        Ok(position)
    }
}
