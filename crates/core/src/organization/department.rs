//! Department payloads.

use hrms_shared::FieldErrors;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, Validated, blank_to_none};

/// Payload for creating or updating a department.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DepartmentInput {
    /// Department name, unique.
    #[validate(required, length(max = 255))]
    pub name: Option<String>,
    /// Description.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Whether the department accepts new positions.
    pub is_active: Option<bool>,
}

impl DepartmentInput {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        blank_to_none(&mut self.name);
        blank_to_none(&mut self.description);
    }
}

impl Validated for DepartmentInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        validation::collect(self.validate()).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required_after_normalize() {
        let mut input = DepartmentInput {
            name: Some("  ".into()),
            ..Default::default()
        };
        input.normalize();
        let errors = input.validate_input().unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "The name field is required.");
    }

    #[test]
    fn test_valid_department() {
        let input = DepartmentInput {
            name: Some("Human Resources".into()),
            description: Some("People operations".into()),
            is_active: Some(true),
        };
        assert!(input.validate_input().is_ok());
    }
}
