//! Integration tests for leave types and balances.

mod common;

use hrms_core::leave::{LeaveBalanceInput, UpdateLeaveBalanceInput};
use hrms_db::{LeaveBalanceRepository, RepositoryError};
use rust_decimal_macros::dec;

use common::{create_employee, create_leave_type};

fn balance_input(employee_id: i32, leave_type_id: i32, total: i64) -> LeaveBalanceInput {
    LeaveBalanceInput {
        employee_id: Some(employee_id),
        leave_type_id: Some(leave_type_id),
        year: Some(2025),
        total_days: Some(total.into()),
        used_days: None,
    }
}

#[tokio::test]
async fn test_balance_remaining_is_derived() {
    let db = common::setup().await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;
    let annual = create_leave_type(&db, "Annual").await;

    let balance = repo
        .create(balance_input(employee.id, annual.id, 10), None)
        .await
        .unwrap();
    assert_eq!(balance.used_days, dec!(0));
    assert_eq!(balance.remaining_days, dec!(10));

    let updated = repo
        .update(
            balance.id,
            &UpdateLeaveBalanceInput {
                total_days: None,
                used_days: Some(dec!(4)),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.total_days, dec!(10));
    assert_eq!(updated.remaining_days, dec!(6));

    let json = serde_json::to_value(&updated).unwrap();
    assert_eq!(json["remaining_days"], 6.0);
}

#[tokio::test]
async fn test_duplicate_triple_rejected() {
    let db = common::setup().await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;
    let annual = create_leave_type(&db, "Annual").await;

    repo.create(balance_input(employee.id, annual.id, 10), None)
        .await
        .unwrap();
    let err = repo
        .create(balance_input(employee.id, annual.id, 12), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(e) if e.contains("employee_id")));
}

#[tokio::test]
async fn test_unknown_references_rejected() {
    let db = common::setup().await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let annual = create_leave_type(&db, "Annual").await;

    let err = repo
        .create(balance_input(999, annual.id, 10), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(e) if e.contains("employee_id")));
}

#[tokio::test]
async fn test_statistics_per_leave_type() {
    let db = common::setup().await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let a = create_employee(&db, "SMRU", "0001", "Aye").await;
    let b = create_employee(&db, "SMRU", "0002", "Bo").await;
    let annual = create_leave_type(&db, "Annual").await;
    let sick = create_leave_type(&db, "Sick").await;

    repo.create(balance_input(a.id, annual.id, 10), None).await.unwrap();
    repo.create(balance_input(b.id, annual.id, 12), None).await.unwrap();
    let sick_balance = repo.create(balance_input(a.id, sick.id, 30), None).await.unwrap();
    repo.update(
        sick_balance.id,
        &UpdateLeaveBalanceInput {
            total_days: None,
            used_days: Some(dec!(2)),
        },
        None,
    )
    .await
    .unwrap();

    let stats = repo.statistics(2025).await.unwrap();
    assert_eq!(stats.leave_types.len(), 2);
    let annual_totals = &stats.leave_types[0];
    assert_eq!(annual_totals.leave_type_name, "Annual");
    assert_eq!(annual_totals.balances, 2);
    assert_eq!(annual_totals.total_days, dec!(22));
    let sick_totals = &stats.leave_types[1];
    assert_eq!(sick_totals.used_days, dec!(2));
    assert_eq!(sick_totals.remaining_days, dec!(28));

    assert!(repo.statistics(2024).await.unwrap().leave_types.is_empty());

    repo.delete(sick_balance.id).await.unwrap();
    assert!(matches!(
        repo.get(sick_balance.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}
