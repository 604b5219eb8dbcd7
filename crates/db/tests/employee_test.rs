//! Integration tests for the employee repositories.

mod common;

use chrono::NaiveDate;
use hrms_core::employee::{
    BankInformation, ChildInput, EmploymentInput, FundingAllocationInput, LanguageInput,
};
use hrms_db::repositories::{DetailKind, EmployeeFilter};
use hrms_db::{EmployeeDetailRepository, EmployeeRepository, ListParams, RepositoryError};
use hrms_shared::types::{PageRequest, SortOrder};
use rust_decimal_macros::dec;

use common::{add_funding, create_department, create_employee, create_position, date};

fn params(sort_by: Option<&str>, sort_order: SortOrder) -> ListParams {
    ListParams {
        page: PageRequest::new(Some(1), Some(20)),
        sort_by: sort_by.map(str::to_string),
        sort_order,
    }
}

fn employment(department_id: i32, position_id: i32) -> EmploymentInput {
    EmploymentInput {
        department_id: Some(department_id),
        position_id: Some(position_id),
        employment_type: Some("Full-Time".into()),
        start_date: Some(date(2024, 1, 1)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_rejects_duplicate_staff_id_within_organization() {
    let db = common::setup().await;
    let repo = EmployeeRepository::new(db.clone());
    create_employee(&db, "SMRU", "0001", "Aye").await;

    let err = repo
        .create(common::employee_input("SMRU", "0001", "Other"), None)
        .await
        .unwrap_err();
    match err {
        RepositoryError::Validation(errors) => assert!(errors.contains("staff_id")),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Same staff id in another organization is fine.
    let bhf = repo
        .create(common::employee_input("BHF", "0001", "Paw"), None)
        .await
        .unwrap();
    assert_eq!(bhf.organization, "BHF");

    let matches = repo.find_by_staff_id("0001", None).await.unwrap();
    assert_eq!(matches.len(), 2);
    let smru_only = repo.find_by_staff_id("0001", Some("SMRU")).await.unwrap();
    assert_eq!(smru_only.len(), 1);
}

#[tokio::test]
async fn test_list_filters_search_and_sorting() {
    let db = common::setup().await;
    let repo = EmployeeRepository::new(db.clone());
    create_employee(&db, "SMRU", "0003", "Cho").await;
    create_employee(&db, "SMRU", "0001", "Aye").await;
    create_employee(&db, "BHF", "0002", "Bo").await;

    let page = repo
        .list(&EmployeeFilter::default(), &params(Some("staff_id"), SortOrder::Asc))
        .await
        .unwrap();
    let staff: Vec<_> = page.data.iter().map(|e| e.staff_id.as_str()).collect();
    assert_eq!(staff, ["0001", "0002", "0003"]);
    assert_eq!(page.pagination.total, 3);

    let smru = repo
        .list(
            &EmployeeFilter {
                organization: Some("SMRU".into()),
                ..Default::default()
            },
            &params(None, SortOrder::Desc),
        )
        .await
        .unwrap();
    assert_eq!(smru.pagination.total, 2);

    let search = repo
        .list(
            &EmployeeFilter {
                search: Some("Cho".into()),
                ..Default::default()
            },
            &params(None, SortOrder::Desc),
        )
        .await
        .unwrap();
    assert_eq!(search.data.len(), 1);
    assert_eq!(search.data[0].staff_id, "0003");
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_key() {
    let db = common::setup().await;
    let err = EmployeeRepository::new(db)
        .list(&EmployeeFilter::default(), &params(Some("salary"), SortOrder::Asc))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(e) if e.contains("sort_by")));
}

#[tokio::test]
async fn test_department_filter_and_sort_go_through_employment() {
    let db = common::setup().await;
    let repo = EmployeeRepository::new(db.clone());
    let details = EmployeeDetailRepository::new(db.clone());

    let admin = create_department(&db, "Administration").await;
    let medical = create_department(&db, "Medical").await;
    let clerk = create_position(&db, admin.id, "Clerk", None, true).await;
    let medic = create_position(&db, medical.id, "Medic", None, true).await;

    let a = create_employee(&db, "SMRU", "0001", "Aye").await;
    let b = create_employee(&db, "SMRU", "0002", "Bo").await;
    create_employee(&db, "SMRU", "0003", "Cho").await;
    details
        .upsert_employment(a.id, employment(medical.id, medic.id), None)
        .await
        .unwrap();
    details
        .upsert_employment(b.id, employment(admin.id, clerk.id), None)
        .await
        .unwrap();

    let filtered = repo
        .list(
            &EmployeeFilter {
                department_id: Some(medical.id),
                ..Default::default()
            },
            &params(None, SortOrder::Desc),
        )
        .await
        .unwrap();
    assert_eq!(filtered.pagination.total, 1);
    assert_eq!(filtered.data[0].id, a.id);

    let sorted = repo
        .list(&EmployeeFilter::default(), &params(Some("department"), SortOrder::Asc))
        .await
        .unwrap();
    assert_eq!(sorted.pagination.total, 3);
    let ids: Vec<i32> = sorted.data.iter().map(|e| e.id).collect();
    // Administration sorts before Medical.
    let pos_b = ids.iter().position(|id| *id == b.id).unwrap();
    let pos_a = ids.iter().position(|id| *id == a.id).unwrap();
    assert!(pos_b < pos_a);
}

#[tokio::test]
async fn test_employment_position_must_match_department() {
    let db = common::setup().await;
    let details = EmployeeDetailRepository::new(db.clone());
    let admin = create_department(&db, "Administration").await;
    let medical = create_department(&db, "Medical").await;
    let medic = create_position(&db, medical.id, "Medic", None, true).await;
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;

    let err = details
        .upsert_employment(employee.id, employment(admin.id, medic.id), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(e) if e.contains("position_id")));

    let saved = details
        .upsert_employment(employee.id, employment(medical.id, medic.id), None)
        .await
        .unwrap();
    let mut update = employment(medical.id, medic.id);
    update.salary = Some(dec!(15000));
    let replaced = details
        .upsert_employment(employee.id, update, None)
        .await
        .unwrap();
    assert_eq!(saved.id, replaced.id);
    assert_eq!(replaced.salary, Some(dec!(15000)));
}

#[tokio::test]
async fn test_details_include_owned_records() {
    let db = common::setup().await;
    let repo = EmployeeRepository::new(db.clone());
    let details = EmployeeDetailRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;

    let language = details
        .add_language(
            employee.id,
            LanguageInput {
                language: Some("Karen".into()),
                proficiency: Some("Native".into()),
            },
        )
        .await
        .unwrap();
    details
        .add_child(
            employee.id,
            ChildInput {
                name: Some("Paw".into()),
                date_of_birth: Some(date(2015, 3, 3)),
            },
        )
        .await
        .unwrap();
    add_funding(&db, employee.id, dec!(60), true).await;

    let full = repo.find_details(employee.id).await.unwrap();
    assert_eq!(full.languages.len(), 1);
    assert_eq!(full.children.len(), 1);
    assert_eq!(full.funding_allocations.len(), 1);
    assert!(full.employment.is_none());

    let json = serde_json::to_value(&full).unwrap();
    assert_eq!(json["staff_id"], "0001");
    assert_eq!(json["funding_allocations"][0]["level_of_effort"], 60.0);

    details
        .delete_detail(DetailKind::Languages, employee.id, language.id)
        .await
        .unwrap();
    let again = details
        .delete_detail(DetailKind::Languages, employee.id, language.id)
        .await
        .unwrap_err();
    assert!(matches!(again, RepositoryError::NotFound("Language")));
}

#[tokio::test]
async fn test_funding_effort_capped_at_hundred() {
    let db = common::setup().await;
    let details = EmployeeDetailRepository::new(db.clone());
    let employee = create_employee(&db, "SMRU", "0001", "Aye").await;
    add_funding(&db, employee.id, dec!(70), true).await;
    add_funding(&db, employee.id, dec!(90), false).await;

    let input = FundingAllocationInput {
        grant_code: Some("GR-02".into()),
        budget_line_code: Some("BL-2".into()),
        level_of_effort: Some(dec!(40)),
        start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
        end_date: None,
        status: None,
    };
    let err = details
        .create_funding_allocation(employee.id, input.clone(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(e) if e.contains("level_of_effort")));

    let ok = details
        .create_funding_allocation(
            employee.id,
            FundingAllocationInput {
                level_of_effort: Some(dec!(30)),
                ..input
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(ok.status, "active");
}

#[tokio::test]
async fn test_segment_update_and_statistics() {
    let db = common::setup().await;
    let repo = EmployeeRepository::new(db.clone());
    let a = create_employee(&db, "SMRU", "0001", "Aye").await;
    create_employee(&db, "BHF", "0002", "Bo").await;

    let updated = repo
        .update_bank(
            a.id,
            BankInformation {
                bank_name: Some("Kasikorn".into()),
                bank_account_number: Some("123-4-56789".into()),
                ..Default::default()
            },
            Some(7),
        )
        .await
        .unwrap();
    assert_eq!(updated.bank_name.as_deref(), Some("Kasikorn"));
    assert_eq!(updated.updated_by, Some(7));
    assert_eq!(updated.first_name_en, "Aye");

    let stats = repo.statistics(date(2025, 6, 1)).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_organization.get("SMRU"), Some(&1));
    assert_eq!(stats.by_organization.get("BHF"), Some(&1));
    assert_eq!(stats.by_gender.get("Female"), Some(&2));
    assert_eq!(stats.active_employments, 0);
}
