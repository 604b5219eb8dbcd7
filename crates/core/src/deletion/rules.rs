//! Dependency rules per deletable entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entities that go through safe delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An employee and their personal records.
    Employee,
    /// A department.
    Department,
    /// A position.
    Position,
    /// A leave type.
    LeaveType,
}

impl EntityKind {
    /// All kinds, for filters and docs.
    pub const ALL: [Self; 4] = [Self::Employee, Self::Department, Self::Position, Self::LeaveType];

    /// Stored and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Department => "department",
            Self::Position => "position",
            Self::LeaveType => "leave_type",
        }
    }

    /// Parses the stored name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }

    /// Live table of the root row.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Employee => "employees",
            Self::Department => "departments",
            Self::Position => "positions",
            Self::LeaveType => "leave_types",
        }
    }

    /// Human name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Department => "department",
            Self::Position => "position",
            Self::LeaveType => "leave type",
        }
    }

    /// Dependents inspected before deleting an entity of this kind.
    #[must_use]
    pub const fn dependents(self) -> &'static [Dependent] {
        match self {
            Self::Employee => &[
                Dependent::ActiveFundingAllocations,
                Dependent::Employment,
                Dependent::Languages,
                Dependent::Educations,
                Dependent::Children,
                Dependent::Beneficiaries,
                Dependent::LeaveBalances,
                Dependent::InactiveFundingAllocations,
            ],
            Self::Department => &[
                Dependent::ActivePositions,
                Dependent::ActiveEmployments,
                Dependent::InactivePositions,
            ],
            Self::Position => &[
                Dependent::PositionEmployments,
                Dependent::ActiveSubordinates,
            ],
            Self::LeaveType => &[Dependent::UsedLeaveBalances, Dependent::UnusedLeaveBalances],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class of dependent rows, scoped to one root entity.
///
/// Each variant names a table plus a filter; the database layer turns it
/// into a count query and a fetch query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependent {
    /// Employee funding allocations with status active.
    ActiveFundingAllocations,
    /// Employee funding allocations with status inactive.
    InactiveFundingAllocations,
    /// The employee's employment record.
    Employment,
    /// Employee languages.
    Languages,
    /// Employee educations.
    Educations,
    /// Employee children.
    Children,
    /// Employee beneficiaries.
    Beneficiaries,
    /// Employee leave balances.
    LeaveBalances,
    /// Active positions in a department.
    ActivePositions,
    /// Inactive positions in a department.
    InactivePositions,
    /// Running employments in a department.
    ActiveEmployments,
    /// Running employments holding a position.
    PositionEmployments,
    /// Active positions reporting to a position.
    ActiveSubordinates,
    /// Leave balances of a type with days already used.
    UsedLeaveBalances,
    /// Leave balances of a type with nothing used.
    UnusedLeaveBalances,
}

impl Dependent {
    /// Table holding the dependent rows.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::ActiveFundingAllocations | Self::InactiveFundingAllocations => {
                "funding_allocations"
            }
            Self::Employment | Self::ActiveEmployments | Self::PositionEmployments => {
                "employments"
            }
            Self::Languages => "employee_languages",
            Self::Educations => "employee_educations",
            Self::Children => "employee_children",
            Self::Beneficiaries => "employee_beneficiaries",
            Self::LeaveBalances | Self::UsedLeaveBalances | Self::UnusedLeaveBalances => {
                "leave_balances"
            }
            Self::ActivePositions | Self::InactivePositions | Self::ActiveSubordinates => {
                "positions"
            }
        }
    }

    /// Plural noun for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ActiveFundingAllocations => "active funding allocations",
            Self::InactiveFundingAllocations => "inactive funding allocations",
            Self::Employment => "employment records",
            Self::Languages => "languages",
            Self::Educations => "education records",
            Self::Children => "children",
            Self::Beneficiaries => "beneficiaries",
            Self::LeaveBalances => "leave balances",
            Self::ActivePositions => "active positions",
            Self::InactivePositions => "inactive positions",
            Self::ActiveEmployments | Self::PositionEmployments => "active employments",
            Self::ActiveSubordinates => "active subordinate positions",
            Self::UsedLeaveBalances => "leave balances with used days",
            Self::UnusedLeaveBalances => "unused leave balances",
        }
    }

    /// Whether existing rows refuse the delete.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::ActiveFundingAllocations
                | Self::ActivePositions
                | Self::ActiveEmployments
                | Self::PositionEmployments
                | Self::ActiveSubordinates
                | Self::UsedLeaveBalances
        )
    }
}

/// A nullable foreign key the database clears when its target row goes.
///
/// Rows holding such a link are neither blockers nor cascade, so the
/// snapshot records the cleared value and a restore writes it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullableLink {
    /// `positions.reports_to_id`.
    PositionReportsTo,
    /// `employments.position_id`.
    EmploymentPosition,
    /// `employments.department_id`.
    EmploymentDepartment,
}

impl NullableLink {
    /// Every link declared with `ON DELETE SET NULL`.
    pub const ALL: [Self; 3] = [
        Self::PositionReportsTo,
        Self::EmploymentPosition,
        Self::EmploymentDepartment,
    ];

    /// Table holding the link column.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::PositionReportsTo => "positions",
            Self::EmploymentPosition | Self::EmploymentDepartment => "employments",
        }
    }

    /// Table the link points at.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::PositionReportsTo | Self::EmploymentPosition => "positions",
            Self::EmploymentDepartment => "departments",
        }
    }

    /// Links pointing at rows of `table`.
    pub fn targeting(table: &str) -> impl Iterator<Item = Self> + '_ {
        Self::ALL.into_iter().filter(move |link| link.target() == table)
    }
}
