//! Employee records.
//!
//! # Modules
//!
//! - `types` - Enumerations and age calculation
//! - `input` - Create/update payloads split into the four editable slices
//! - `details` - Employment, languages, educations, children, beneficiaries
//! - `funding` - Funding allocations and level-of-effort rules

pub mod details;
pub mod funding;
pub mod input;
pub mod types;

pub use details::{
    BeneficiaryInput, ChildInput, EducationInput, EmploymentInput, LanguageInput,
};
pub use funding::{FundingAllocationInput, FundingStatus, check_total_effort};
pub use input::{
    BankInformation, BasicInformation, EmployeeInput, FamilyInformation, PersonalInformation,
};
pub use types::{
    GENDERS, IDENTIFICATION_TYPES, MARITAL_STATUSES, ORGANIZATIONS, STATUSES, age_on,
    display_name,
};
