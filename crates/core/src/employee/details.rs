//! Records owned by an employee: employment and the repeating detail rows.

use chrono::{NaiveDate, Utc};
use hrms_shared::FieldErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::{self, Validated, one_of};

/// Employment contract categories.
pub const EMPLOYMENT_TYPES: &[&str] = &["Full-Time", "Part-Time", "Contract", "Temporary"];

/// How salary is paid.
pub const PAY_METHODS: &[&str] = &["Transfer", "Cash"];

/// Language proficiency levels.
pub const PROFICIENCY_LEVELS: &[&str] = &["Basic", "Intermediate", "Advanced", "Native"];

fn valid_employment_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, EMPLOYMENT_TYPES, "employment_type")
}

fn valid_pay_method(value: &str) -> Result<(), ValidationError> {
    one_of(value, PAY_METHODS, "pay_method")
}

fn valid_proficiency(value: &str) -> Result<(), ValidationError> {
    one_of(value, PROFICIENCY_LEVELS, "proficiency")
}

/// Returns true when an employment ending on `end_date` is still running on `today`.
#[must_use]
pub fn is_active_employment(end_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    end_date.is_none_or(|end| end >= today)
}

/// Payload for creating or replacing an employee's employment record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmploymentInput {
    /// Department the employee works in.
    #[validate(required)]
    pub department_id: Option<i32>,
    /// Position held.
    #[validate(required)]
    pub position_id: Option<i32>,
    /// Contract category.
    #[validate(required, custom(function = "valid_employment_type"))]
    pub employment_type: Option<String>,
    /// First working day.
    #[validate(required)]
    pub start_date: Option<NaiveDate>,
    /// Last working day, if ended or scheduled to end.
    pub end_date: Option<NaiveDate>,
    /// Date probation was passed.
    pub probation_pass_date: Option<NaiveDate>,
    /// Salary payment method.
    #[validate(custom(function = "valid_pay_method"))]
    pub pay_method: Option<String>,
    /// Monthly salary.
    pub salary: Option<Decimal>,
}

impl Validated for EmploymentInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::ordered(&mut errors, "end_date", self.start_date, self.end_date, "start_date");
        validation::ordered(
            &mut errors,
            "probation_pass_date",
            self.start_date,
            self.probation_pass_date,
            "start_date",
        );
        validation::decimal_between(&mut errors, "salary", self.salary, Decimal::ZERO, None);
        errors.into_result()
    }
}

/// A language spoken by the employee.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LanguageInput {
    /// Language name.
    #[validate(required, length(max = 100))]
    pub language: Option<String>,
    /// Proficiency level.
    #[validate(custom(function = "valid_proficiency"))]
    pub proficiency: Option<String>,
}

impl Validated for LanguageInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        validation::collect(self.validate()).into_result()
    }
}

/// An education history entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EducationInput {
    /// School or institution.
    #[validate(required, length(max = 255))]
    pub school_name: Option<String>,
    /// Degree or qualification.
    #[validate(required, length(max = 255))]
    pub degree: Option<String>,
    /// Start date.
    #[validate(required)]
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

impl Validated for EducationInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::ordered(&mut errors, "end_date", self.start_date, self.end_date, "start_date");
        errors.into_result()
    }
}

/// A child of the employee.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ChildInput {
    /// Child name.
    #[validate(required, length(max = 255))]
    pub name: Option<String>,
    /// Child date of birth.
    #[validate(required)]
    pub date_of_birth: Option<NaiveDate>,
}

impl Validated for ChildInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        validation::not_after(
            &mut errors,
            "date_of_birth",
            self.date_of_birth,
            Utc::now().date_naive(),
        );
        errors.into_result()
    }
}

/// A beneficiary named by the employee.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BeneficiaryInput {
    /// Beneficiary name.
    #[validate(required, length(max = 255))]
    pub name: Option<String>,
    /// Relationship to the employee.
    #[validate(required, length(max = 100))]
    pub relationship: Option<String>,
    /// Phone number.
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
}

impl Validated for BeneficiaryInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        validation::collect(self.validate()).into_result()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_employment_requires_core_fields() {
        let errors = EmploymentInput::default().validate_input().unwrap_err();
        for field in ["department_id", "position_id", "employment_type", "start_date"] {
            assert!(errors.contains(field), "expected error for {field}");
        }
    }

    #[test]
    fn test_employment_dates_and_salary() {
        let input = EmploymentInput {
            department_id: Some(1),
            position_id: Some(2),
            employment_type: Some("Full-Time".into()),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2023, 12, 31)),
            probation_pass_date: Some(date(2024, 4, 1)),
            pay_method: Some("Cheque".into()),
            salary: Some(dec!(-5)),
        };
        let errors = input.validate_input().unwrap_err();
        assert!(errors.contains("end_date"));
        assert!(errors.contains("pay_method"));
        assert!(errors.contains("salary"));
        assert!(!errors.contains("probation_pass_date"));
    }

    #[test]
    fn test_is_active_employment() {
        let today = date(2025, 6, 1);
        assert!(is_active_employment(None, today));
        assert!(is_active_employment(Some(date(2025, 6, 1)), today));
        assert!(!is_active_employment(Some(date(2025, 5, 31)), today));
    }

    #[test]
    fn test_detail_inputs() {
        assert!(
            LanguageInput {
                language: Some("Karen".into()),
                proficiency: Some("Native".into()),
            }
            .validate_input()
            .is_ok()
        );
        assert!(
            LanguageInput {
                language: Some("Karen".into()),
                proficiency: Some("Fluent-ish".into()),
            }
            .validate_input()
            .unwrap_err()
            .contains("proficiency")
        );
        assert!(
            BeneficiaryInput {
                name: Some("Saw Lay".into()),
                relationship: None,
                phone_number: None,
            }
            .validate_input()
            .unwrap_err()
            .contains("relationship")
        );
        assert!(
            ChildInput {
                name: Some("Paw".into()),
                date_of_birth: Some(date(2015, 3, 3)),
            }
            .validate_input()
            .is_ok()
        );
        assert!(
            EducationInput {
                school_name: Some("Mae Sot High".into()),
                degree: Some("Diploma".into()),
                start_date: Some(date(2010, 6, 1)),
                end_date: Some(date(2009, 3, 1)),
            }
            .validate_input()
            .unwrap_err()
            .contains("end_date")
        );
    }
}
