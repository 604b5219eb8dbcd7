//! Notification feed persisted from domain events.

use chrono::Utc;
use hrms_core::events::DomainEvent;
use hrms_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::error::RepositoryError;
use crate::entities::notifications;

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores the rendered message for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(&self, event: &DomainEvent) -> Result<notifications::Model, DbErr> {
        notifications::ActiveModel {
            action: Set(event.action.as_str().to_string()),
            entity_type: Set(event.entity.clone()),
            entity_id: Set(event.entity_id),
            message: Set(event.message()),
            actor_id: Set(event.actor_id),
            read_at: Set(None),
            created_at: Set(event.occurred_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Newest notifications first, optionally only unread ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<PageResponse<notifications::Model>, DbErr> {
        let mut query = notifications::Entity::find();
        if unread_only {
            query = query.filter(notifications::Column::ReadAt.is_null());
        }
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Marks a notification read. Already-read notifications keep their timestamp.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the notification does not exist.
    pub async fn mark_read(&self, id: i32) -> Result<notifications::Model, RepositoryError> {
        let existing = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound("Notification"))?;
        if existing.read_at.is_some() {
            return Ok(existing);
        }
        let mut model: notifications::ActiveModel = existing.into();
        model.read_at = Set(Some(Utc::now()));
        Ok(model.update(&self.db).await?)
    }
}
