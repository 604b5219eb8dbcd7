//! Integration tests for safe delete, restore and purge.

mod common;

use hrms_core::deletion::{BatchStatus, EntityKind, Snapshot};
use hrms_core::employee::{ChildInput, EmploymentInput, LanguageInput};
use hrms_core::leave::{LeaveBalanceInput, UpdateLeaveBalanceInput};
use hrms_db::entities::{employee_children, employee_languages, employees, leave_balances};
use hrms_db::{
    EmployeeDetailRepository, EmployeeRepository, LeaveBalanceRepository, RecycleBinRepository,
    SafeDeleteError,
};
use hrms_shared::types::PageRequest;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

use common::{
    add_funding, create_department, create_employee, create_leave_type, create_position, date,
};

async fn employee_with_details(db: &sea_orm::DatabaseConnection) -> employees::Model {
    let employee = create_employee(db, "SMRU", "0042", "Aye").await;
    let details = EmployeeDetailRepository::new(db.clone());
    details
        .add_language(
            employee.id,
            LanguageInput {
                language: Some("Burmese".into()),
                proficiency: Some("Native".into()),
            },
        )
        .await
        .unwrap();
    for name in ["Paw", "Htoo"] {
        details
            .add_child(
                employee.id,
                ChildInput {
                    name: Some(name.into()),
                    date_of_birth: Some(date(2016, 1, 1)),
                },
            )
            .await
            .unwrap();
    }
    employee
}

#[tokio::test]
async fn test_employee_with_active_funding_is_blocked() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let employee = employee_with_details(&db).await;
    add_funding(&db, employee.id, dec!(50), true).await;

    let err = bin
        .safe_delete(EntityKind::Employee, employee.id, None, Some(1))
        .await
        .unwrap_err();
    let SafeDeleteError::Blocked(blocked) = err else {
        panic!("expected blocked delete");
    };
    assert_eq!(blocked.messages(), ["1 active funding allocations"]);

    // Nothing moved.
    assert_eq!(employee_children::Entity::find().count(&db).await.unwrap(), 2);
    assert!(employees::Entity::find_by_id(employee.id).one(&db).await.unwrap().is_some());
}

#[tokio::test]
async fn test_employee_delete_and_restore_round_trip() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let employee = employee_with_details(&db).await;
    add_funding(&db, employee.id, dec!(40), false).await;

    let manifest = bin
        .safe_delete(EntityKind::Employee, employee.id, Some("left".into()), Some(1))
        .await
        .unwrap();
    assert!(manifest.deletion_key.starts_with("employee_"));
    assert_eq!(manifest.entity_label, "0042 Aye Test");
    // root + language + 2 children + inactive funding
    assert_eq!(manifest.snapshot_count, 5);

    let snapshot: Snapshot = serde_json::from_value(manifest.snapshot.clone()).unwrap();
    assert_eq!(snapshot.row_count(), 5);

    assert!(employees::Entity::find_by_id(employee.id).one(&db).await.unwrap().is_none());
    assert_eq!(employee_children::Entity::find().count(&db).await.unwrap(), 0);

    let listed = bin.list(Some(EntityKind::Employee), PageRequest::default()).await.unwrap();
    assert_eq!(listed.pagination.total, 1);
    assert_eq!(listed.data[0].reason.as_deref(), Some("left"));

    let restored = bin.restore(&manifest.deletion_key).await.unwrap();
    assert_eq!(restored.entity_id, employee.id);
    assert_eq!(restored.restored_rows, 5);

    let back = employees::Entity::find_by_id(employee.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(back, employee);
    assert_eq!(employee_children::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(employee_languages::Entity::find().count(&db).await.unwrap(), 1);

    assert!(matches!(
        bin.find(&manifest.deletion_key).await,
        Err(SafeDeleteError::ManifestNotFound)
    ));
}

#[tokio::test]
async fn test_restore_conflicts_with_reused_staff_id() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;

    let manifest = bin
        .safe_delete(EntityKind::Employee, employee.id, None, None)
        .await
        .unwrap();
    create_employee(&db, "SMRU", "0001", "Someone Else").await;

    let err = bin.restore(&manifest.deletion_key).await.unwrap_err();
    assert!(matches!(err, SafeDeleteError::RestoreConflict(_)));
    // The manifest survives a failed restore.
    assert!(bin.find(&manifest.deletion_key).await.is_ok());
}

#[tokio::test]
async fn test_department_rules() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let department = create_department(&db, "Medical").await;
    create_position(&db, department.id, "Doctor", None, true).await;

    let err = bin
        .safe_delete(EntityKind::Department, department.id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SafeDeleteError::Blocked(_)));

    // With only inactive positions left the department goes, taking them along.
    let empty = create_department(&db, "Closed").await;
    let old = create_position(&db, empty.id, "Old Role", None, false).await;
    let old_report = create_position(&db, empty.id, "Old Assistant", Some(old.id), false).await;
    let manifest = bin
        .safe_delete(EntityKind::Department, empty.id, None, None)
        .await
        .unwrap();
    assert_eq!(manifest.snapshot_count, 3);

    let restored = bin.restore(&manifest.deletion_key).await.unwrap();
    assert_eq!(restored.restored_rows, 3);
    let assistant = hrms_db::entities::positions::Entity::find_by_id(old_report.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assistant.reports_to_id, Some(old.id));
}

#[tokio::test]
async fn test_position_with_running_employment_is_blocked() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let department = create_department(&db, "Medical").await;
    let position = create_position(&db, department.id, "Doctor", None, true).await;
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;
    EmployeeDetailRepository::new(db.clone())
        .upsert_employment(
            employee.id,
            EmploymentInput {
                department_id: Some(department.id),
                position_id: Some(position.id),
                employment_type: Some("Full-Time".into()),
                start_date: Some(date(2024, 1, 1)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let err = bin
        .safe_delete(EntityKind::Position, position.id, None, None)
        .await
        .unwrap_err();
    let SafeDeleteError::Blocked(blocked) = err else {
        panic!("expected blocked delete");
    };
    assert_eq!(blocked.messages(), ["1 active employments"]);
}

#[tokio::test]
async fn test_leave_type_blocked_only_by_used_balances() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let balances = LeaveBalanceRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;
    let annual = create_leave_type(&db, "Annual").await;
    let sick = create_leave_type(&db, "Sick").await;

    let input = |leave_type_id| LeaveBalanceInput {
        employee_id: Some(employee.id),
        leave_type_id: Some(leave_type_id),
        year: Some(2025),
        total_days: Some(dec!(10)),
        used_days: None,
    };
    let used = balances.create(input(annual.id), None).await.unwrap();
    balances
        .update(
            used.id,
            &UpdateLeaveBalanceInput {
                total_days: None,
                used_days: Some(dec!(1)),
            },
            None,
        )
        .await
        .unwrap();
    balances.create(input(sick.id), None).await.unwrap();

    assert!(matches!(
        bin.safe_delete(EntityKind::LeaveType, annual.id, None, None).await,
        Err(SafeDeleteError::Blocked(_))
    ));

    let manifest = bin
        .safe_delete(EntityKind::LeaveType, sick.id, None, None)
        .await
        .unwrap();
    assert_eq!(manifest.snapshot_count, 2);
    assert_eq!(leave_balances::Entity::find().count(&db).await.unwrap(), 1);

    let purged = bin.purge(&manifest.deletion_key).await.unwrap();
    assert_eq!(purged.entity_label, "Sick");
    assert!(matches!(
        bin.restore(&manifest.deletion_key).await,
        Err(SafeDeleteError::ManifestNotFound)
    ));
}

#[tokio::test]
async fn test_batch_delete_reports_each_id() {
    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let free = create_employee(&db, "SMRU", "0001", "Aye").await;
    let funded = create_employee(&db, "SMRU", "0002", "Bo").await;
    add_funding(&db, funded.id, dec!(100), true).await;

    let summary = bin
        .batch_delete(EntityKind::Employee, &[free.id, funded.id, 999], None, None)
        .await;
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.status(), BatchStatus::Partial);
    assert!(summary.results[0].deletion_key.is_some());
    assert_eq!(summary.results[1].blockers, ["1 active funding allocations"]);
    assert_eq!(summary.results[2].message, "employee not found");

    assert_eq!(
        EmployeeRepository::new(db.clone())
            .find_by_staff_id("0002", None)
            .await
            .unwrap()
            .len(),
        1
    );
}

async fn ended_employment(
    db: &sea_orm::DatabaseConnection,
    staff_id: &str,
    department_id: i32,
    position_id: i32,
) -> hrms_db::entities::employments::Model {
    let employee = create_employee(db, "SMRU", staff_id, "Former").await;
    EmployeeDetailRepository::new(db.clone())
        .upsert_employment(
            employee.id,
            EmploymentInput {
                department_id: Some(department_id),
                position_id: Some(position_id),
                employment_type: Some("Full-Time".into()),
                start_date: Some(date(2020, 1, 1)),
                end_date: Some(date(2021, 12, 31)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_position_restore_relinks_subordinates_and_past_employments() {
    use hrms_db::entities::{employments, positions};

    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let department = create_department(&db, "Medical").await;
    let manager = create_position(&db, department.id, "Head Doctor", None, true).await;
    let retired = create_position(&db, department.id, "Night Doctor", Some(manager.id), false).await;
    let past = ended_employment(&db, "0009", department.id, manager.id).await;

    let manifest = bin
        .safe_delete(EntityKind::Position, manager.id, None, None)
        .await
        .unwrap();
    assert_eq!(manifest.snapshot_count, 1);
    let snapshot: Snapshot = serde_json::from_value(manifest.snapshot.clone()).unwrap();
    assert_eq!(snapshot.links.len(), 2);

    // The database cleared both links while the manager was gone.
    let orphan = positions::Entity::find_by_id(retired.id).one(&db).await.unwrap().unwrap();
    assert_eq!(orphan.reports_to_id, None);
    let unplaced = employments::Entity::find_by_id(past.id).one(&db).await.unwrap().unwrap();
    assert_eq!(unplaced.position_id, None);

    bin.restore(&manifest.deletion_key).await.unwrap();

    let subordinate = positions::Entity::find_by_id(retired.id).one(&db).await.unwrap().unwrap();
    assert_eq!(subordinate.reports_to_id, Some(manager.id));
    let employment = employments::Entity::find_by_id(past.id).one(&db).await.unwrap().unwrap();
    assert_eq!(employment.position_id, Some(manager.id));
    assert_eq!(employment.department_id, Some(department.id));
}

#[tokio::test]
async fn test_department_restore_relinks_past_employments() {
    use hrms_db::entities::employments;

    let db = common::setup().await;
    let bin = RecycleBinRepository::new(db.clone());
    let department = create_department(&db, "Closed Clinic").await;
    let position = create_position(&db, department.id, "Nurse", None, false).await;
    let past = ended_employment(&db, "0010", department.id, position.id).await;

    let manifest = bin
        .safe_delete(EntityKind::Department, department.id, None, None)
        .await
        .unwrap();
    // department + inactive position
    assert_eq!(manifest.snapshot_count, 2);

    bin.restore(&manifest.deletion_key).await.unwrap();

    let employment = employments::Entity::find_by_id(past.id).one(&db).await.unwrap().unwrap();
    assert_eq!(employment.department_id, Some(department.id));
    assert_eq!(employment.position_id, Some(position.id));
}
