//! `SeaORM` entity definitions.

pub mod prelude;

pub mod deletion_manifests;
pub mod departments;
pub mod employee_beneficiaries;
pub mod employee_children;
pub mod employee_educations;
pub mod employee_languages;
pub mod employees;
pub mod employments;
pub mod funding_allocations;
pub mod import_jobs;
pub mod leave_balances;
pub mod leave_types;
pub mod lookups;
pub mod notifications;
pub mod positions;
pub mod users;
