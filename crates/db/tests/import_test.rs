//! Integration tests for import persistence and job records.

mod common;

use hrms_core::import::columns::column_index;
use hrms_core::import::{EMPLOYEE_COLUMNS, ImportJobStatus, prepare};
use hrms_db::{EmployeeRepository, ImportJobRepository, ImportRepository, RepositoryError};

use common::{create_employee, date};

fn sheet(rows: &[[&str; 7]]) -> Vec<Vec<String>> {
    let fields = [
        "organization",
        "staff_id",
        "first_name_en",
        "gender",
        "date_of_birth",
        "status",
        "last_name_en",
    ];
    let header: Vec<String> = EMPLOYEE_COLUMNS.iter().map(|c| c.header.to_string()).collect();
    let mut out = vec![header];
    for values in rows {
        let mut row = vec![String::new(); EMPLOYEE_COLUMNS.len()];
        for (field, value) in fields.iter().zip(values) {
            row[column_index(field).unwrap()] = (*value).to_string();
        }
        out.push(row);
    }
    out
}

#[tokio::test]
async fn test_persist_skips_database_duplicates() {
    let db = common::setup().await;
    create_employee(&db, "SMRU", "0001", "Existing").await;

    let rows = sheet(&[
        ["SMRU", "0001", "Aye", "Female", "1990-05-01", "Local ID Staff", "Mya"],
        ["SMRU", "0002", "Bo", "Male", "1985-01-15", "Local ID Staff", "Htoo"],
        ["BHF", "0001", "Cho", "Female", "1992-07-30", "Local non ID Staff", "Win"],
    ]);
    let prepared = prepare(&rows, date(2025, 6, 1)).unwrap();
    assert_eq!(prepared.rows.len(), 3);

    let report = ImportRepository::new(db.clone())
        .persist(prepared, Some(1))
        .await
        .unwrap();
    assert_eq!(report.processed_count, 3);
    assert_eq!(report.imported_count, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert!(report.errors[0].messages[0].contains("already exists"));

    let bhf = EmployeeRepository::new(db)
        .find_by_staff_id("0001", Some("BHF"))
        .await
        .unwrap();
    assert_eq!(bhf[0].created_by, Some(1));
}

#[tokio::test]
async fn test_import_job_lifecycle() {
    let db = common::setup().await;
    let jobs = ImportJobRepository::new(db.clone());

    let job = jobs.create("staff.xlsx", 350, Some(1)).await.unwrap();
    assert_eq!(job.status, ImportJobStatus::Queued.as_str());
    assert_eq!(job.total_rows, 350);

    jobs.mark_processing(&job.import_id).await.unwrap();

    let rows = sheet(&[["SMRU", "0009", "Aye", "Female", "1990-05-01", "Local ID Staff", "Mya"]]);
    let report = ImportRepository::new(db.clone())
        .persist(prepare(&rows, date(2025, 6, 1)).unwrap(), None)
        .await
        .unwrap();
    let done = jobs.complete(&job.import_id, &report).await.unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.imported_count, 1);
    assert_eq!(done.errors, serde_json::json!([]));

    let failed = jobs.create("broken.csv", 500, None).await.unwrap();
    let failed = jobs.fail(&failed.import_id, "unreadable").await.unwrap();
    assert_eq!(failed.message.as_deref(), Some("unreadable"));

    assert!(matches!(
        jobs.find("missing").await,
        Err(RepositoryError::NotFound("Import"))
    ));
}

#[tokio::test]
async fn test_unfinished_jobs_fail_after_restart() {
    let db = common::setup().await;
    let jobs = ImportJobRepository::new(db.clone());

    let queued = jobs.create("queued.xlsx", 300, None).await.unwrap();
    let running = jobs.create("running.xlsx", 300, None).await.unwrap();
    jobs.mark_processing(&running.import_id).await.unwrap();
    let finished = jobs.create("done.xlsx", 300, None).await.unwrap();
    let finished = jobs
        .fail(&finished.import_id, "unreadable")
        .await
        .unwrap();

    assert_eq!(jobs.fail_unfinished("interrupted").await.unwrap(), 2);

    for id in [&queued.import_id, &running.import_id] {
        let job = jobs.find(id).await.unwrap();
        assert_eq!(job.status, ImportJobStatus::Failed.as_str());
        assert_eq!(job.message.as_deref(), Some("interrupted"));
    }
    // Settled jobs keep their own outcome.
    let untouched = jobs.find(&finished.import_id).await.unwrap();
    assert_eq!(untouched.message.as_deref(), Some("unreadable"));

    assert_eq!(jobs.fail_unfinished("interrupted").await.unwrap(), 0);
}
