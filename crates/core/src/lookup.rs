//! Generic `(type, value)` pairs backing dropdown enumerations.

use hrms_shared::FieldErrors;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, Validated, blank_to_none};

/// Lookup types seeded at install time. Clients may add others.
pub const LOOKUP_TYPES: &[&str] = &[
    "gender",
    "organization",
    "employee_status",
    "identification_type",
    "marital_status",
    "military_status",
    "nationality",
    "religion",
    "employment_type",
    "pay_method",
    "language_proficiency",
    "bank_name",
];

/// Longest accepted lookup type.
const MAX_TYPE_LENGTH: usize = 50;

/// Payload for creating or updating a lookup entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LookupInput {
    /// Lookup group, snake_case. Checked by hand so errors key on `type`.
    #[serde(rename = "type")]
    pub lookup_type: Option<String>,
    /// Display value.
    #[validate(required, length(max = 255))]
    pub value: Option<String>,
}

impl LookupInput {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        blank_to_none(&mut self.lookup_type);
        blank_to_none(&mut self.value);
    }
}

impl Validated for LookupInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        match self.lookup_type.as_deref() {
            None => errors.add("type", "The type field is required."),
            Some(t) if t.chars().count() > MAX_TYPE_LENGTH => errors.add(
                "type",
                format!("The type may not be greater than {MAX_TYPE_LENGTH} characters."),
            ),
            Some(t)
                if !t
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') =>
            {
                errors.add(
                    "type",
                    "The type may only contain lowercase letters, digits and underscores.",
                );
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}
