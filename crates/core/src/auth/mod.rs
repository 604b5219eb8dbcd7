//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Roles an HRMS user can hold.
///
/// Any authenticated user may read and edit HR records; the role only
/// decides who may restore or purge recycle-bin entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// System administrator.
    Admin,
    /// Owns the HR records and the recycle bin.
    HrManager,
    /// Day-to-day HR data entry.
    HrAssistant,
    /// Occasional user without recycle-bin rights.
    Viewer,
}

impl UserRole {
    /// Parses the stored role name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "hr_manager" => Some(Self::HrManager),
            "hr_assistant" => Some(Self::HrAssistant),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns true if this role may restore or purge recycle-bin entries.
    #[must_use]
    pub const fn can_manage_recycle_bin(&self) -> bool {
        matches!(self, Self::Admin | Self::HrManager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::HrManager => write!(f, "hr_manager"),
            Self::HrAssistant => write!(f, "hr_assistant"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}
