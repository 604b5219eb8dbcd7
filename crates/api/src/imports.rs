//! Employee import execution and the background queue for large uploads.

use std::sync::Arc;

use chrono::Utc;
use hrms_core::cache::{StatsCache, StatsKey};
use hrms_core::events::{DomainEvent, EventAction};
use hrms_core::import::{ImportReport, prepare};
use hrms_db::{ImportJobRepository, ImportRepository};
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{error, info, warn};

use crate::error::ApiResult;
use crate::events::EventBus;

/// A parsed sheet waiting for the worker.
#[derive(Debug, Clone)]
pub struct ImportTask {
    /// Status record key.
    pub import_id: String,
    /// Original upload name.
    pub file_name: String,
    /// Every sheet row, header included.
    pub rows: Vec<Vec<String>>,
    /// Uploading user.
    pub actor: Option<i32>,
}

/// Sending half of the import queue.
#[derive(Debug, Clone)]
pub struct ImportQueue {
    sender: UnboundedSender<ImportTask>,
}

impl ImportQueue {
    /// Creates a queue and the receiver a worker drains.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ImportTask>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Hands a task to the worker. Returns false when the worker is gone.
    #[must_use]
    pub fn enqueue(&self, task: ImportTask) -> bool {
        self.sender.send(task).is_ok()
    }
}

/// Validates and persists a sheet, then tells everyone about it.
///
/// # Errors
///
/// Fails on sheet-level problems (empty, missing columns) and database errors.
pub async fn import_rows(
    db: &DatabaseConnection,
    rows: &[Vec<String>],
    actor: Option<i32>,
    cache: &StatsCache,
    events: &EventBus,
) -> ApiResult<ImportReport> {
    let prepared = prepare(rows, Utc::now().date_naive())?;
    let report = ImportRepository::new(db.clone()).persist(prepared, actor).await?;

    if report.imported_count > 0 {
        cache.invalidate(StatsKey::EmployeeStatistics);
        events.publish(DomainEvent::new(
            EventAction::Imported,
            "employee",
            None,
            format!("{} rows", report.imported_count),
            actor,
        ));
    }
    Ok(report)
}

/// Fails jobs a previous process left queued or processing.
///
/// Call once at startup, before the server accepts uploads.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn fail_interrupted(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
    let failed = ImportJobRepository::new(db.clone())
        .fail_unfinished("Import was interrupted by a server restart; upload the file again")
        .await?;
    if failed > 0 {
        warn!(failed, "Failed imports interrupted by a restart");
    }
    Ok(failed)
}

/// Starts the import worker and returns the queue feeding it.
#[must_use]
pub fn spawn_worker(db: Arc<DatabaseConnection>, cache: StatsCache, events: EventBus) -> ImportQueue {
    let (queue, receiver) = ImportQueue::channel();
    tokio::spawn(run_worker(db, cache, events, receiver));
    queue
}

async fn run_worker(
    db: Arc<DatabaseConnection>,
    cache: StatsCache,
    events: EventBus,
    mut receiver: UnboundedReceiver<ImportTask>,
) {
    let jobs = ImportJobRepository::new((*db).clone());

    while let Some(task) = receiver.recv().await {
        if let Err(e) = jobs.mark_processing(&task.import_id).await {
            error!(error = %e, import_id = %task.import_id, "Failed to mark import as processing");
            if let Err(e) = jobs.fail(&task.import_id, "Import could not be started").await {
                error!(error = %e, import_id = %task.import_id, "Failed to mark import as failed");
            }
            continue;
        }

        match import_rows(&db, &task.rows, task.actor, &cache, &events).await {
            Ok(report) => {
                info!(
                    import_id = %task.import_id,
                    file = %task.file_name,
                    imported = report.imported_count,
                    errors = report.errors.len(),
                    "Queued import finished"
                );
                if let Err(e) = jobs.complete(&task.import_id, &report).await {
                    error!(error = %e, import_id = %task.import_id, "Failed to store import report");
                }
            }
            Err(e) => {
                warn!(error = ?e.0, import_id = %task.import_id, "Queued import failed");
                if let Err(e) = jobs.fail(&task.import_id, &e.0.to_string()).await {
                    error!(error = %e, import_id = %task.import_id, "Failed to mark import as failed");
                }
            }
        }
    }
}
