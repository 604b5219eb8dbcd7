//! Employee create/update payloads.
//!
//! An employee is edited in four independent slices (basic, personal,
//! family, bank). The full [`EmployeeInput`] is the four slices flattened
//! together, so create, full update, segmented updates and spreadsheet rows
//! all share one set of rules.

use chrono::{NaiveDate, Utc};
use hrms_shared::FieldErrors;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::types::{GENDERS, IDENTIFICATION_TYPES, MARITAL_STATUSES, ORGANIZATIONS, STATUSES};
use crate::validation::{self, Validated, blank_to_none, one_of};

fn valid_organization(value: &str) -> Result<(), ValidationError> {
    one_of(value, ORGANIZATIONS, "organization")
}

fn valid_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, STATUSES, "status")
}

fn valid_gender(value: &str) -> Result<(), ValidationError> {
    one_of(value, GENDERS, "gender")
}

fn valid_identification_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, IDENTIFICATION_TYPES, "identification_type")
}

fn valid_marital_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, MARITAL_STATUSES, "marital_status")
}

/// Identity and demographic fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BasicInformation {
    /// Employing organization.
    #[validate(required, custom(function = "valid_organization"))]
    pub organization: Option<String>,
    /// Staff id, unique within the organization.
    #[validate(required, length(max = 50))]
    pub staff_id: Option<String>,
    /// English initial (Mr., Ms., ...).
    #[validate(length(max = 10))]
    pub initial_en: Option<String>,
    /// Thai initial.
    #[validate(length(max = 20))]
    pub initial_th: Option<String>,
    /// English first name.
    #[validate(required, length(max = 255))]
    pub first_name_en: Option<String>,
    /// English last name.
    #[validate(length(max = 255))]
    pub last_name_en: Option<String>,
    /// Thai first name.
    #[validate(length(max = 255))]
    pub first_name_th: Option<String>,
    /// Thai last name.
    #[validate(length(max = 255))]
    pub last_name_th: Option<String>,
    /// Gender.
    #[validate(required, custom(function = "valid_gender"))]
    pub gender: Option<String>,
    /// Date of birth.
    #[validate(required)]
    pub date_of_birth: Option<NaiveDate>,
    /// Employment status category.
    #[validate(required, custom(function = "valid_status"))]
    pub status: Option<String>,
}

impl BasicInformation {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.organization,
            &mut self.staff_id,
            &mut self.initial_en,
            &mut self.initial_th,
            &mut self.first_name_en,
            &mut self.last_name_en,
            &mut self.first_name_th,
            &mut self.last_name_th,
            &mut self.gender,
            &mut self.status,
        ] {
            blank_to_none(field);
        }
    }
}

impl Validated for BasicInformation {
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

/// Identification, contact and civil-status fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PersonalInformation {
    /// Nationality.
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    /// Religion.
    #[validate(length(max = 100))]
    pub religion: Option<String>,
    /// Identification document type.
    #[validate(custom(function = "valid_identification_type"))]
    pub identification_type: Option<String>,
    /// Identification document number.
    #[validate(length(max = 50))]
    pub identification_number: Option<String>,
    /// Social security number.
    #[validate(length(max = 50))]
    pub social_security_number: Option<String>,
    /// Tax number.
    #[validate(length(max = 50))]
    pub tax_number: Option<String>,
    /// Mobile phone.
    #[validate(length(max = 20))]
    pub mobile_phone: Option<String>,
    /// Permanent address.
    #[validate(length(max = 1000))]
    pub permanent_address: Option<String>,
    /// Current address.
    #[validate(length(max = 1000))]
    pub current_address: Option<String>,
    /// Military service status.
    #[validate(length(max = 50))]
    pub military_status: Option<String>,
    /// Marital status.
    #[validate(custom(function = "valid_marital_status"))]
    pub marital_status: Option<String>,
    /// Driver license number.
    #[validate(length(max = 50))]
    pub driver_license_number: Option<String>,
    /// Free-form remark.
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl PersonalInformation {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.nationality,
            &mut self.religion,
            &mut self.identification_type,
            &mut self.identification_number,
            &mut self.social_security_number,
            &mut self.tax_number,
            &mut self.mobile_phone,
            &mut self.permanent_address,
            &mut self.current_address,
            &mut self.military_status,
            &mut self.marital_status,
            &mut self.driver_license_number,
            &mut self.remark,
        ] {
            blank_to_none(field);
        }
    }
}

impl Validated for PersonalInformation {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        if self.identification_type.is_some() && self.identification_number.is_none() {
            errors.add(
                "identification_number",
                "The identification number field is required when identification type is present.",
            );
        }
        errors.into_result()
    }
}

/// Spouse, emergency contact and parent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FamilyInformation {
    /// Spouse name.
    #[validate(length(max = 255))]
    pub spouse_name: Option<String>,
    /// Spouse phone number.
    #[validate(length(max = 20))]
    pub spouse_phone_number: Option<String>,
    /// Emergency contact name.
    #[validate(length(max = 255))]
    pub emergency_contact_person_name: Option<String>,
    /// Emergency contact relationship.
    #[validate(length(max = 100))]
    pub emergency_contact_person_relationship: Option<String>,
    /// Emergency contact phone.
    #[validate(length(max = 20))]
    pub emergency_contact_person_phone: Option<String>,
    /// Father's name.
    #[validate(length(max = 255))]
    pub father_name: Option<String>,
    /// Father's occupation.
    #[validate(length(max = 255))]
    pub father_occupation: Option<String>,
    /// Father's phone number.
    #[validate(length(max = 20))]
    pub father_phone_number: Option<String>,
    /// Mother's name.
    #[validate(length(max = 255))]
    pub mother_name: Option<String>,
    /// Mother's occupation.
    #[validate(length(max = 255))]
    pub mother_occupation: Option<String>,
    /// Mother's phone number.
    #[validate(length(max = 20))]
    pub mother_phone_number: Option<String>,
}

impl FamilyInformation {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.spouse_name,
            &mut self.spouse_phone_number,
            &mut self.emergency_contact_person_name,
            &mut self.emergency_contact_person_relationship,
            &mut self.emergency_contact_person_phone,
            &mut self.father_name,
            &mut self.father_occupation,
            &mut self.father_phone_number,
            &mut self.mother_name,
            &mut self.mother_occupation,
            &mut self.mother_phone_number,
        ] {
            blank_to_none(field);
        }
    }
}

impl Validated for FamilyInformation {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        if self.emergency_contact_person_name.is_some()
            && self.emergency_contact_person_phone.is_none()
        {
            errors.add(
                "emergency_contact_person_phone",
                "The emergency contact person phone field is required when emergency contact person name is present.",
            );
        }
        errors.into_result()
    }
}

/// Payroll bank account fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BankInformation {
    /// Bank name.
    #[validate(length(max = 100))]
    pub bank_name: Option<String>,
    /// Bank branch.
    #[validate(length(max = 100))]
    pub bank_branch: Option<String>,
    /// Account holder name.
    #[validate(length(max = 255))]
    pub bank_account_name: Option<String>,
    /// Account number.
    #[validate(length(max = 50))]
    pub bank_account_number: Option<String>,
}

impl BankInformation {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.bank_name,
            &mut self.bank_branch,
            &mut self.bank_account_name,
            &mut self.bank_account_number,
        ] {
            blank_to_none(field);
        }
    }
}

impl Validated for BankInformation {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = validation::collect(self.validate());
        if self.bank_account_number.is_some() && self.bank_name.is_none() {
            errors.add(
                "bank_name",
                "The bank name field is required when bank account number is present.",
            );
        }
        errors.into_result()
    }
}

/// Full employee payload used by create, full update and import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// Identity and demographics.
    #[serde(flatten)]
    pub basic: BasicInformation,
    /// Identification and contact.
    #[serde(flatten)]
    pub personal: PersonalInformation,
    /// Family and emergency contacts.
    #[serde(flatten)]
    pub family: FamilyInformation,
    /// Bank account.
    #[serde(flatten)]
    pub bank: BankInformation,
}

impl EmployeeInput {
    /// Trims strings and drops blanks in every slice.
    pub fn normalize(&mut self) {
        self.basic.normalize();
        self.personal.normalize();
        self.family.normalize();
        self.bank.normalize();
    }

    /// Staff id, or an empty string when absent.
    #[must_use]
    pub fn staff_id(&self) -> &str {
        self.basic.staff_id.as_deref().unwrap_or_default()
    }
}

impl Validated for EmployeeInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for result in [
            self.basic.validate_input(),
            self.personal.validate_input(),
            self.family.validate_input(),
            self.bank.validate_input(),
        ] {
            if let Err(slice_errors) = result {
                errors.merge(slice_errors);
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn valid_input() -> EmployeeInput {
        EmployeeInput {
            basic: BasicInformation {
                organization: Some("SMRU".into()),
                staff_id: Some("EMP001".into()),
                first_name_en: Some("Aye".into()),
                last_name_en: Some("Mya".into()),
                gender: Some("Female".into()),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1),
                status: Some("Local ID Staff".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validate_input().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = EmployeeInput::default().validate_input().unwrap_err();
        for field in [
            "organization",
            "staff_id",
            "first_name_en",
            "gender",
            "date_of_birth",
            "status",
        ] {
            assert!(errors.contains(field), "expected error for {field}");
        }
        assert_eq!(
            errors.get("staff_id").unwrap()[0],
            "The staff id field is required."
        );
    }

    #[test]
    fn test_enumerations_enforced() {
        let mut input = valid_input();
        input.basic.organization = Some("ACME".into());
        input.basic.gender = Some("Unknown".into());
        input.personal.marital_status = Some("Complicated".into());

        let errors = input.validate_input().unwrap_err();
        assert!(errors.contains("organization"));
        assert!(errors.contains("gender"));
        assert!(errors.contains("marital_status"));
        assert!(!errors.contains("status"));
    }

    #[test]
    fn test_future_date_of_birth_rejected() {
        let mut input = valid_input();
        input.basic.date_of_birth = Some(Utc::now().date_naive() + chrono::Duration::days(2));
        let errors = input.validate_input().unwrap_err();
        assert!(errors.contains("date_of_birth"));
    }

    #[test]
    fn test_identification_number_required_with_type() {
        let mut input = valid_input();
        input.personal.identification_type = Some("Passport".into());
        let errors = input.validate_input().unwrap_err();
        assert!(errors.contains("identification_number"));

        input.personal.identification_number = Some("MA123456".into());
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn test_normalize_turns_blanks_into_missing() {
        let mut input = valid_input();
        input.basic.staff_id = Some("   ".into());
        input.bank.bank_name = Some(" Kasikorn ".into());
        input.normalize();

        assert_eq!(input.basic.staff_id, None);
        assert_eq!(input.bank.bank_name.as_deref(), Some("Kasikorn"));
        assert!(input.validate_input().unwrap_err().contains("staff_id"));
    }

    #[test]
    fn test_flattened_json_shape() {
        let json = serde_json::json!({
            "organization": "BHF",
            "staff_id": "B-17",
            "first_name_en": "Naw",
            "gender": "Female",
            "date_of_birth": "1988-11-02",
            "status": "Local non ID Staff",
            "bank_name": "SCB",
            "father_name": "Saw"
        });
        let input: EmployeeInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.basic.organization.as_deref(), Some("BHF"));
        assert_eq!(input.bank.bank_name.as_deref(), Some("SCB"));
        assert_eq!(input.family.father_name.as_deref(), Some("Saw"));
        assert!(input.validate_input().is_ok());
    }
}
