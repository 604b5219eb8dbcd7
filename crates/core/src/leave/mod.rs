//! Leave types and per-year leave balances.

pub mod balance;
pub mod leave_type;

pub use balance::{LeaveBalanceInput, LeaveDays, UpdateLeaveBalanceInput, remaining_days};
pub use leave_type::LeaveTypeInput;
