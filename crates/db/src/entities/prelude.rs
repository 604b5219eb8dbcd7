//! Entity prelude.

pub use super::deletion_manifests::Entity as DeletionManifests;
pub use super::departments::Entity as Departments;
pub use super::employee_beneficiaries::Entity as EmployeeBeneficiaries;
pub use super::employee_children::Entity as EmployeeChildren;
pub use super::employee_educations::Entity as EmployeeEducations;
pub use super::employee_languages::Entity as EmployeeLanguages;
pub use super::employees::Entity as Employees;
pub use super::employments::Entity as Employments;
pub use super::funding_allocations::Entity as FundingAllocations;
pub use super::import_jobs::Entity as ImportJobs;
pub use super::leave_balances::Entity as LeaveBalances;
pub use super::leave_types::Entity as LeaveTypes;
pub use super::lookups::Entity as Lookups;
pub use super::notifications::Entity as Notifications;
pub use super::positions::Entity as Positions;
pub use super::users::Entity as Users;
