//! Organization structure: departments and the position hierarchy.

pub mod department;
pub mod position;

pub use department::DepartmentInput;
pub use position::{HierarchyError, PositionInput, PositionNode, check_reports_to};
