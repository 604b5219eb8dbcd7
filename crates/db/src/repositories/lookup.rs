//! Lookup repository.

use chrono::Utc;
use hrms_core::lookup::LookupInput;
use hrms_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::error::{RepositoryError, unique_violation};
use super::query::like;
use crate::entities::lookups;

const DUPLICATE_VALUE: &str = "The value has already been taken for this type.";

/// Filter options for listing lookups.
#[derive(Debug, Clone, Default)]
pub struct LookupFilter {
    /// Exact type.
    pub lookup_type: Option<String>,
    /// Substring of the value.
    pub search: Option<String>,
}

/// Lookup repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct LookupRepository {
    db: DatabaseConnection,
}

impl LookupRepository {
    /// Creates a new lookup repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists lookups ordered by type then value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &LookupFilter,
        page: PageRequest,
    ) -> Result<PageResponse<lookups::Model>, DbErr> {
        let mut query = lookups::Entity::find();
        if let Some(lookup_type) = &filter.lookup_type {
            query = query.filter(lookups::Column::LookupType.eq(lookup_type.as_str()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(lookups::Column::Value.like(like(search)));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(lookups::Column::LookupType)
            .order_by_asc(lookups::Column::Value)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Distinct lookup types in use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn types(&self) -> Result<Vec<String>, DbErr> {
        lookups::Entity::find()
            .select_only()
            .column(lookups::Column::LookupType)
            .distinct()
            .order_by_asc(lookups::Column::LookupType)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// All values of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn by_type(&self, lookup_type: &str) -> Result<Vec<lookups::Model>, DbErr> {
        lookups::Entity::find()
            .filter(lookups::Column::LookupType.eq(lookup_type))
            .order_by_asc(lookups::Column::Value)
            .all(&self.db)
            .await
    }

    /// Loads a lookup or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the lookup does not exist.
    pub async fn get(&self, id: i32) -> Result<lookups::Model, RepositoryError> {
        lookups::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound("Lookup"))
    }

    async fn pair_taken(
        &self,
        lookup_type: &str,
        value: &str,
        except_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = lookups::Entity::find()
            .filter(lookups::Column::LookupType.eq(lookup_type))
            .filter(lookups::Column::Value.eq(value));
        if let Some(id) = except_id {
            query = query.filter(lookups::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a lookup.
    ///
    /// # Errors
    ///
    /// Returns a `value` validation error for a duplicate (type, value).
    pub async fn create(
        &self,
        input: LookupInput,
        actor: Option<i32>,
    ) -> Result<lookups::Model, RepositoryError> {
        let lookup_type = input.lookup_type.unwrap_or_default();
        let value = input.value.unwrap_or_default();
        if self.pair_taken(&lookup_type, &value, None).await? {
            return Err(RepositoryError::field("value", DUPLICATE_VALUE));
        }

        let now = Utc::now();
        let lookup = lookups::ActiveModel {
            lookup_type: Set(lookup_type),
            value: Set(value),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_violation(e, "value", DUPLICATE_VALUE))?;

        info!(lookup_id = lookup.id, lookup_type = %lookup.lookup_type, "Lookup created");
        Ok(lookup)
    }

    /// Updates a lookup.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `value` validation error.
    pub async fn update(
        &self,
        id: i32,
        input: LookupInput,
        actor: Option<i32>,
    ) -> Result<lookups::Model, RepositoryError> {
        let existing = self.get(id).await?;
        let lookup_type = input.lookup_type.unwrap_or_default();
        let value = input.value.unwrap_or_default();
        if self.pair_taken(&lookup_type, &value, Some(id)).await? {
            return Err(RepositoryError::field("value", DUPLICATE_VALUE));
        }

        let mut model: lookups::ActiveModel = existing.into();
        model.lookup_type = Set(lookup_type);
        model.value = Set(value);
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let lookup = model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, "value", DUPLICATE_VALUE))?;

        info!(lookup_id = id, "Lookup updated");
        Ok(lookup)
    }

    /// Deletes a lookup.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the lookup does not exist.
    pub async fn delete(&self, id: i32) -> Result<lookups::Model, RepositoryError> {
        let existing = self.get(id).await?;
        lookups::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(lookup_id = id, "Lookup deleted");
        Ok(existing)
    }
}
