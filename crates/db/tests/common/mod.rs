//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the
//! production migrator. The pool holds exactly one connection so the
//! database lives as long as the pool.

#![allow(dead_code)]

use chrono::NaiveDate;
use hrms_core::employee::{BasicInformation, EmployeeInput, FundingAllocationInput};
use hrms_core::leave::LeaveTypeInput;
use hrms_core::organization::{DepartmentInput, PositionInput};
use hrms_db::entities::{departments, employees, leave_types, positions};
use hrms_db::migration::Migrator;
use hrms_db::{
    DepartmentRepository, EmployeeDetailRepository, EmployeeRepository, LeaveTypeRepository,
    PositionRepository,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn employee_input(organization: &str, staff_id: &str, first_name: &str) -> EmployeeInput {
    EmployeeInput {
        basic: BasicInformation {
            organization: Some(organization.into()),
            staff_id: Some(staff_id.into()),
            first_name_en: Some(first_name.into()),
            last_name_en: Some("Test".into()),
            gender: Some("Female".into()),
            date_of_birth: Some(date(1990, 5, 1)),
            status: Some("Local ID Staff".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub async fn create_employee(
    db: &DatabaseConnection,
    organization: &str,
    staff_id: &str,
    first_name: &str,
) -> employees::Model {
    EmployeeRepository::new(db.clone())
        .create(employee_input(organization, staff_id, first_name), Some(1))
        .await
        .expect("Failed to create employee")
}

pub async fn create_department(db: &DatabaseConnection, name: &str) -> departments::Model {
    DepartmentRepository::new(db.clone())
        .create(
            DepartmentInput {
                name: Some(name.into()),
                description: None,
                is_active: Some(true),
            },
            Some(1),
        )
        .await
        .expect("Failed to create department")
}

pub async fn create_position(
    db: &DatabaseConnection,
    department_id: i32,
    title: &str,
    reports_to_id: Option<i32>,
    is_active: bool,
) -> positions::Model {
    PositionRepository::new(db.clone())
        .create(
            PositionInput {
                title: Some(title.into()),
                department_id: Some(department_id),
                reports_to_id,
                level: Some(2),
                is_manager: Some(false),
                is_active: Some(is_active),
            },
            Some(1),
        )
        .await
        .expect("Failed to create position")
}

pub async fn create_leave_type(db: &DatabaseConnection, name: &str) -> leave_types::Model {
    LeaveTypeRepository::new(db.clone())
        .create(
            LeaveTypeInput {
                name: Some(name.into()),
                default_duration: Some(Decimal::from(10)),
                description: None,
                requires_attachment: Some(false),
            },
            Some(1),
        )
        .await
        .expect("Failed to create leave type")
}

pub async fn add_funding(
    db: &DatabaseConnection,
    employee_id: i32,
    effort: Decimal,
    active: bool,
) {
    use hrms_core::employee::FundingStatus;

    EmployeeDetailRepository::new(db.clone())
        .create_funding_allocation(
            employee_id,
            FundingAllocationInput {
                grant_code: Some("GR-01".into()),
                budget_line_code: Some("BL-1".into()),
                level_of_effort: Some(effort),
                start_date: Some(date(2025, 1, 1)),
                end_date: None,
                status: Some(if active {
                    FundingStatus::Active
                } else {
                    FundingStatus::Inactive
                }),
            },
            Some(1),
        )
        .await
        .expect("Failed to add funding allocation");
}
