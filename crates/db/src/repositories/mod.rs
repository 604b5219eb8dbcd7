//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod department;
pub mod employee;
pub mod employee_detail;
pub mod error;
pub mod import;
pub mod import_job;
pub mod leave_balance;
pub mod leave_type;
pub mod lookup;
pub mod notification;
pub mod position;
pub mod query;
pub mod recycle_bin;
pub mod user;

pub use department::{DEPARTMENT_SORTS, DepartmentFilter, DepartmentRepository};
pub use employee::{
    EMPLOYEE_SORTS, EmployeeDetails, EmployeeFilter, EmployeeRepository, EmployeeStatistics,
};
pub use employee_detail::{DetailKind, EmployeeDetailRepository};
pub use error::RepositoryError;
pub use import::ImportRepository;
pub use import_job::ImportJobRepository;
pub use leave_balance::{
    LEAVE_BALANCE_SORTS, LeaveBalanceFilter, LeaveBalanceRepository, LeaveStatistics,
    LeaveTypeTotals,
};
pub use leave_type::LeaveTypeRepository;
pub use lookup::{LookupFilter, LookupRepository};
pub use notification::NotificationRepository;
pub use position::{POSITION_SORTS, PositionDetails, PositionFilter, PositionRepository};
pub use query::ListParams;
pub use recycle_bin::{ManifestSummary, RecycleBinRepository, RestoredEntity, SafeDeleteError};
pub use user::UserRepository;
