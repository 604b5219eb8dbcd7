//! Core business logic for the HRMS backend.
//!
//! This crate contains pure business logic with no web or database dependencies.
//! Payload types, validation rules, derived values and planning live here.
//!
//! # Modules
//!
//! - `validation` - Field error collection and shared rules
//! - `employee` - Employee payloads, details and funding allocations
//! - `organization` - Departments and the position hierarchy
//! - `leave` - Leave types and balance arithmetic
//! - `lookup` - Dropdown `(type, value)` pairs
//! - `import` - Spreadsheet layout and the row import pipeline
//! - `deletion` - Safe-delete rules, plans and snapshots
//! - `events` - Domain events for notifications
//! - `cache` - Statistics cache
//! - `auth` - Roles and password hashing

pub mod auth;
pub mod cache;
pub mod deletion;
pub mod employee;
pub mod events;
pub mod import;
pub mod leave;
pub mod lookup;
pub mod organization;
pub mod validation;
