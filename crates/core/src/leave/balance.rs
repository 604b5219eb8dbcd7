//! Leave balance payloads and day arithmetic.
//!
//! `remaining_days` is never accepted from clients. It is derived from
//! `total_days - used_days` whenever either side changes. Used days may
//! exceed the total, in which case the remainder goes negative and the
//! balance reads as overdrawn.

use chrono::{Datelike, Utc};
use hrms_shared::FieldErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, Validated};

/// Earliest accepted balance year.
pub const MIN_YEAR: i32 = 2000;

/// Remaining days for a balance.
#[must_use]
pub fn remaining_days(total_days: Decimal, used_days: Decimal) -> Decimal {
    total_days - used_days
}

/// The three day counters of a balance, kept consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveDays {
    /// Days granted.
    pub total: Decimal,
    /// Days taken.
    pub used: Decimal,
    /// `total - used`.
    pub remaining: Decimal,
}

impl LeaveDays {
    /// Builds counters from total and used days.
    #[must_use]
    pub fn new(total: Decimal, used: Decimal) -> Self {
        Self {
            total,
            used,
            remaining: remaining_days(total, used),
        }
    }

    /// Applies a partial update and recomputes the remainder.
    #[must_use]
    pub fn apply(self, update: &UpdateLeaveBalanceInput) -> Self {
        Self::new(
            update.total_days.unwrap_or(self.total),
            update.used_days.unwrap_or(self.used),
        )
    }
}

/// Payload for creating a leave balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LeaveBalanceInput {
    /// Employee the balance belongs to.
    #[validate(required)]
    pub employee_id: Option<i32>,
    /// Leave type.
    #[validate(required)]
    pub leave_type_id: Option<i32>,
    /// Calendar year.
    #[validate(required)]
    pub year: Option<i32>,
    /// Days granted.
    pub total_days: Option<Decimal>,
    /// Days already taken, defaults to zero.
    pub used_days: Option<Decimal>,
}

impl LeaveBalanceInput {
    /// Counters implied by this payload.
    #[must_use]
    pub fn days(&self) -> LeaveDays {
        LeaveDays::new(
            self.total_days.unwrap_or_default(),
            self.used_days.unwrap_or_default(),
        )
    }
}

fn check_year(errors: &mut FieldErrors, year: Option<i32>) {
    let max_year = Utc::now().year() + 1;
    if let Some(year) = year
        && !(MIN_YEAR..=max_year).contains(&year)
    {
        errors.add(
            "year",
            format!("The year must be between {MIN_YEAR} and {max_year}."),
        );
    }
}

impl Validated for LeaveBalanceInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::require(&mut errors, "total_days", self.total_days.as_ref());
        validation::decimal_between(&mut errors, "total_days", self.total_days, Decimal::ZERO, None);
        validation::decimal_between(&mut errors, "used_days", self.used_days, Decimal::ZERO, None);
        check_year(&mut errors, self.year);
        errors.into_result()
    }
}

/// Payload for updating a leave balance. Identity fields are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLeaveBalanceInput {
    /// New total days.
    pub total_days: Option<Decimal>,
    /// New used days.
    pub used_days: Option<Decimal>,
}

impl Validated for UpdateLeaveBalanceInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validation::decimal_between(&mut errors, "total_days", self.total_days, Decimal::ZERO, None);
        validation::decimal_between(&mut errors, "used_days", self.used_days, Decimal::ZERO, None);
        errors.into_result()
    }
}
