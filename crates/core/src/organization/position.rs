//! Position payloads and reporting-line rules.
//!
//! Positions form a forest through `reports_to_id`. A position may only
//! report to another position in the same department, and an update must
//! never close a loop in the reporting chain.

use std::collections::{HashMap, HashSet};

use hrms_shared::FieldErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::validation::{self, Validated, blank_to_none};

/// Payload for creating or updating a position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PositionInput {
    /// Position title.
    #[validate(required, length(max = 255))]
    pub title: Option<String>,
    /// Owning department.
    #[validate(required)]
    pub department_id: Option<i32>,
    /// Manager position, if any.
    pub reports_to_id: Option<i32>,
    /// Seniority level (1 = most senior).
    #[validate(range(min = 1, max = 10))]
    pub level: Option<i32>,
    /// Whether holders manage other staff.
    pub is_manager: Option<bool>,
    /// Whether the position is open for assignment.
    pub is_active: Option<bool>,
}

impl PositionInput {
    /// Trims strings and drops blanks.
    pub fn normalize(&mut self) {
        blank_to_none(&mut self.title);
    }
}

impl Validated for PositionInput {
    fn validate_input(&self) -> Result<(), FieldErrors> {
        validation::collect(self.validate()).into_result()
    }
}

/// Minimal view of a stored position used for hierarchy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionNode {
    /// Position id.
    pub id: i32,
    /// Department id.
    pub department_id: i32,
    /// Manager position id.
    pub reports_to_id: Option<i32>,
}

/// Reporting-line violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// A position cannot report to itself.
    #[error("A position cannot report to itself.")]
    SelfReference,
    /// The manager position does not exist.
    #[error("The selected reports to position does not exist.")]
    ManagerNotFound(i32),
    /// The manager sits in another department.
    #[error("The reports to position must belong to the same department.")]
    DepartmentMismatch,
    /// The change would create a reporting loop.
    #[error("The reports to position would create a circular reporting line.")]
    Cycle,
}

impl From<HierarchyError> for FieldErrors {
    fn from(error: HierarchyError) -> Self {
        Self::single("reports_to_id", error.to_string())
    }
}

/// Validates that `position_id` (None when creating) may report to `manager_id`.
///
/// `nodes` must contain every position of the department, including the
/// manager and, for updates, the position itself.
///
/// # Errors
///
/// Returns the first [`HierarchyError`] found.
pub fn check_reports_to(
    position_id: Option<i32>,
    department_id: i32,
    manager_id: i32,
    nodes: &[PositionNode],
) -> Result<(), HierarchyError> {
    if position_id == Some(manager_id) {
        return Err(HierarchyError::SelfReference);
    }

    let by_id: HashMap<i32, &PositionNode> = nodes.iter().map(|n| (n.id, n)).collect();
    let manager = by_id
        .get(&manager_id)
        .ok_or(HierarchyError::ManagerNotFound(manager_id))?;
    if manager.department_id != department_id {
        return Err(HierarchyError::DepartmentMismatch);
    }

    let Some(position_id) = position_id else {
        return Ok(());
    };

    // Walk up from the manager; meeting the position means a loop.
    let mut seen = HashSet::new();
    let mut cursor = Some(manager_id);
    while let Some(current) = cursor {
        if current == position_id {
            return Err(HierarchyError::Cycle);
        }
        if !seen.insert(current) {
            break;
        }
        cursor = by_id.get(&current).and_then(|n| n.reports_to_id);
    }
    Ok(())
}
