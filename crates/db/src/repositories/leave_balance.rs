//! Leave balance repository.
//!
//! `remaining_days` is always written from [`LeaveDays`], never from input.

use std::collections::BTreeMap;

use chrono::Utc;
use hrms_core::leave::{LeaveBalanceInput, LeaveDays, UpdateLeaveBalanceInput};
use hrms_shared::types::PageResponse;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::info;

use super::error::{RepositoryError, unique_violation};
use super::query::ListParams;
use crate::entities::{employees, leave_balances, leave_types};

/// Sort keys accepted by [`LeaveBalanceRepository::list`].
pub const LEAVE_BALANCE_SORTS: &[&str] = &["year", "total_days", "used_days", "remaining_days"];

const DUPLICATE_BALANCE: &str =
    "A leave balance for this employee, leave type and year already exists.";

/// Filter options for listing balances.
#[derive(Debug, Clone, Default)]
pub struct LeaveBalanceFilter {
    /// Owning employee.
    pub employee_id: Option<i32>,
    /// Leave type.
    pub leave_type_id: Option<i32>,
    /// Calendar year.
    pub year: Option<i32>,
}

/// Day totals for one leave type in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveTypeTotals {
    /// Leave type id.
    pub leave_type_id: i32,
    /// Leave type name.
    pub leave_type_name: String,
    /// Number of balances.
    pub balances: u64,
    /// Sum of granted days.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_days: Decimal,
    /// Sum of used days.
    #[serde(with = "rust_decimal::serde::float")]
    pub used_days: Decimal,
    /// Sum of remaining days.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_days: Decimal,
}

/// Leave statistics for a year.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveStatistics {
    /// Year summarized.
    pub year: i32,
    /// One entry per leave type that has balances.
    pub leave_types: Vec<LeaveTypeTotals>,
}

/// Leave balance repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct LeaveBalanceRepository {
    db: DatabaseConnection,
}

impl LeaveBalanceRepository {
    /// Creates a new leave balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists balances.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown sort keys, or a database error.
    pub async fn list(
        &self,
        filter: &LeaveBalanceFilter,
        params: &ListParams,
    ) -> Result<PageResponse<leave_balances::Model>, RepositoryError> {
        let sort = params.sort_key(LEAVE_BALANCE_SORTS, "year")?;

        let mut query = leave_balances::Entity::find();
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(leave_balances::Column::EmployeeId.eq(employee_id));
        }
        if let Some(leave_type_id) = filter.leave_type_id {
            query = query.filter(leave_balances::Column::LeaveTypeId.eq(leave_type_id));
        }
        if let Some(year) = filter.year {
            query = query.filter(leave_balances::Column::Year.eq(year));
        }

        let total = query.clone().count(&self.db).await?;
        let column = match sort {
            "total_days" => leave_balances::Column::TotalDays,
            "used_days" => leave_balances::Column::UsedDays,
            "remaining_days" => leave_balances::Column::RemainingDays,
            _ => leave_balances::Column::Year,
        };
        let data = query
            .order_by(column, params.order())
            .order_by_asc(leave_balances::Column::Id)
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, params.page, total))
    }

    /// Finds a balance by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<leave_balances::Model>, DbErr> {
        leave_balances::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a balance or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the balance does not exist.
    pub async fn get(&self, id: i32) -> Result<leave_balances::Model, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound("Leave balance"))
    }

    /// Creates a balance. Used days default to zero.
    ///
    /// # Errors
    ///
    /// Returns validation errors for unknown employee or leave type, or for a
    /// duplicate (employee, leave type, year).
    pub async fn create(
        &self,
        input: LeaveBalanceInput,
        actor: Option<i32>,
    ) -> Result<leave_balances::Model, RepositoryError> {
        let employee_id = input.employee_id.unwrap_or_default();
        let leave_type_id = input.leave_type_id.unwrap_or_default();
        let year = input.year.unwrap_or_default();

        if employees::Entity::find_by_id(employee_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::field(
                "employee_id",
                "The selected employee id is invalid.",
            ));
        }
        if leave_types::Entity::find_by_id(leave_type_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::field(
                "leave_type_id",
                "The selected leave type id is invalid.",
            ));
        }
        let exists = leave_balances::Entity::find()
            .filter(leave_balances::Column::EmployeeId.eq(employee_id))
            .filter(leave_balances::Column::LeaveTypeId.eq(leave_type_id))
            .filter(leave_balances::Column::Year.eq(year))
            .count(&self.db)
            .await?
            > 0;
        if exists {
            return Err(RepositoryError::field("employee_id", DUPLICATE_BALANCE));
        }

        let days = input.days();
        let now = Utc::now();
        let balance = leave_balances::ActiveModel {
            employee_id: Set(employee_id),
            leave_type_id: Set(leave_type_id),
            year: Set(year),
            total_days: Set(days.total),
            used_days: Set(days.used),
            remaining_days: Set(days.remaining),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_violation(e, "employee_id", DUPLICATE_BALANCE))?;

        info!(
            balance_id = balance.id,
            employee_id,
            leave_type_id,
            year,
            "Leave balance created"
        );
        Ok(balance)
    }

    /// Updates total and/or used days and recomputes the remainder.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the balance does not exist.
    pub async fn update(
        &self,
        id: i32,
        input: &UpdateLeaveBalanceInput,
        actor: Option<i32>,
    ) -> Result<leave_balances::Model, RepositoryError> {
        let existing = self.get(id).await?;
        let days = LeaveDays::new(existing.total_days, existing.used_days).apply(input);

        let mut model: leave_balances::ActiveModel = existing.into();
        model.total_days = Set(days.total);
        model.used_days = Set(days.used);
        model.remaining_days = Set(days.remaining);
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let balance = model.update(&self.db).await?;

        info!(balance_id = id, remaining_days = %balance.remaining_days, "Leave balance updated");
        Ok(balance)
    }

    /// Deletes a balance outright.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the balance does not exist.
    pub async fn delete(&self, id: i32) -> Result<leave_balances::Model, RepositoryError> {
        let existing = self.get(id).await?;
        leave_balances::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(balance_id = id, "Leave balance deleted");
        Ok(existing)
    }

    /// Per leave type totals for `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn statistics(&self, year: i32) -> Result<LeaveStatistics, DbErr> {
        let rows = leave_balances::Entity::find()
            .filter(leave_balances::Column::Year.eq(year))
            .find_also_related(leave_types::Entity)
            .all(&self.db)
            .await?;

        let mut totals: BTreeMap<i32, LeaveTypeTotals> = BTreeMap::new();
        for (balance, leave_type) in rows {
            let entry = totals
                .entry(balance.leave_type_id)
                .or_insert_with(|| LeaveTypeTotals {
                    leave_type_id: balance.leave_type_id,
                    leave_type_name: leave_type.map(|t| t.name).unwrap_or_default(),
                    balances: 0,
                    total_days: Decimal::ZERO,
                    used_days: Decimal::ZERO,
                    remaining_days: Decimal::ZERO,
                });
            entry.balances += 1;
            entry.total_days += balance.total_days;
            entry.used_days += balance.used_days;
            entry.remaining_days += balance.remaining_days;
        }

        Ok(LeaveStatistics {
            year,
            leave_types: totals.into_values().collect(),
        })
    }
}
