//! Shared types, errors, and configuration for the HRMS backend.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types and field-level validation errors
//! - Pagination types for list endpoints
//! - JWT claims and token handling
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, LoginRequest, LoginResponse, UserInfo};
pub use config::{AppConfig, CacheConfig, ImportConfig};
pub use error::{AppError, AppResult, FieldErrors};
pub use jwt::{JwtConfig, JwtError, JwtService};
