//! Persistence of validated import rows.

use hrms_core::import::{ImportReport, PreparedImport};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::{info, warn};

use super::employee::{insert_employee, staff_id_taken};

/// Writes prepared import rows.
#[derive(Debug, Clone)]
pub struct ImportRepository {
    db: DatabaseConnection,
}

impl ImportRepository {
    /// Creates a new import repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts every prepared row in one transaction.
    ///
    /// Rows whose (organization, staff id) already exists in the database are
    /// turned into row errors; the rest are inserted. Warnings for rejected
    /// rows are dropped and errors come back in row order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is persisted then.
    pub async fn persist(
        &self,
        prepared: PreparedImport,
        actor: Option<i32>,
    ) -> Result<ImportReport, DbErr> {
        let PreparedImport { rows, mut report } = prepared;
        let txn = self.db.begin().await?;

        for row in rows {
            let organization = row.input.basic.organization.clone().unwrap_or_default();
            let staff_id = row.input.staff_id().to_string();
            if staff_id_taken(&txn, &organization, &staff_id, None).await? {
                warn!(row = row.row, staff_id = %staff_id, "Import row duplicates an existing employee");
                report.reject(
                    row.row,
                    Some(staff_id),
                    vec![format!(
                        "Staff id {} already exists in {organization}.",
                        row.input.staff_id()
                    )],
                );
                continue;
            }
            insert_employee(&txn, row.input, actor).await?;
            report.imported_count += 1;
        }

        txn.commit().await?;

        report.prune_warnings();
        report.errors.sort_by_key(|e| e.row);
        info!(
            processed = report.processed_count,
            imported = report.imported_count,
            failed = report.errors.len(),
            "Employee import persisted"
        );
        Ok(report)
    }
}
