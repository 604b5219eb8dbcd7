//! Leave type payloads.

use hrms_shared::FieldErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, Validated, blank_to_none};

/// Payload for creating or updating a leave type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LeaveTypeInput {
    /// Leave type name, unique.
    #[validate(required, length(max = 100))]
    pub name: Option<String>,
    /// Days granted per year by default.
    pub default_duration: Option<Decimal>,
    /// Description.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Whether requests need a supporting document.
    pub requires_attachment: Option<bool>,
}

impl LeaveTypeInput {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        blank_to_none(&mut self.name);
        blank_to_none(&mut self.description);
    }
}

impl Validated for LeaveTypeInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::decimal_between(
            &mut errors,
            "default_duration",
            self.default_duration,
            Decimal::ZERO,
            Some(Decimal::from(366)),
        );
        errors.into_result()
    }
}
