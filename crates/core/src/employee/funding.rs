//! Funding allocations: which grant line pays for how much of an employee.

use chrono::NaiveDate;
use hrms_shared::FieldErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, Validated};

/// Allocation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingStatus {
    /// Currently charged.
    Active,
    /// Closed or superseded.
    Inactive,
}

impl FundingStatus {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses the stored column value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Payload for creating or updating a funding allocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FundingAllocationInput {
    /// Grant code.
    #[validate(required, length(max = 50))]
    pub grant_code: Option<String>,
    /// Budget line within the grant.
    #[validate(required, length(max = 50))]
    pub budget_line_code: Option<String>,
    /// Percentage of the employee's time charged (0-100].
    pub level_of_effort: Option<Decimal>,
    /// First charged day.
    #[validate(required)]
    pub start_date: Option<NaiveDate>,
    /// Last charged day.
    pub end_date: Option<NaiveDate>,
    /// Lifecycle state, defaults to active.
    pub status: Option<FundingStatus>,
}

impl Validated for FundingAllocationInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::require(&mut errors, "level_of_effort", self.level_of_effort.as_ref());
        if let Some(effort) = self.level_of_effort
            && effort <= Decimal::ZERO
        {
            errors.add("level_of_effort", "The level of effort must be greater than 0.");
        }
        validation::decimal_between(
            &mut errors,
            "level_of_effort",
            self.level_of_effort,
            Decimal::ZERO,
            Some(Decimal::ONE_HUNDRED),
        );
        validation::ordered(&mut errors, "end_date", self.start_date, self.end_date, "start_date");
        errors.into_result()
    }
}

/// Checks that active allocations for one employee do not exceed 100%.
///
/// `existing` holds the efforts of the employee's other active allocations.
///
/// # Errors
///
/// Returns a `level_of_effort` field error naming the resulting total.
pub fn check_total_effort(existing: &[Decimal], proposed: Decimal) -> Result<(), FieldErrors> {
    let total: Decimal = existing.iter().copied().sum::<Decimal>() + proposed;
    if total > Decimal::ONE_HUNDRED {
        return Err(FieldErrors::single(
            "level_of_effort",
            format!("Total active level of effort would be {total}%, which exceeds 100%."),
        ));
    }
    Ok(())
}
