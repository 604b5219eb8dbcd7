//! Safe delete and the recycle bin.
//!
//! A safe delete runs in one transaction: dependent rows are loaded, the
//! blocking ones refuse the delete, the rest are serialized together with
//! the root row into a `deletion_manifests` entry and then removed,
//! dependents first. Live rows whose nullable links the database clears
//! on the way are recorded too. Restoring replays the snapshot root first,
//! writes those links back and drops the manifest.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use hrms_core::deletion::{
    BatchDeleteOutcome, BatchDeleteSummary, DeletionBlocked, DeletionPlan, Dependent,
    DetachedLink, EntityKind, NullableLink, Snapshot, new_deletion_key,
};
use hrms_core::employee::FundingStatus;
use hrms_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
    TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::entities::{
    deletion_manifests, departments, employee_beneficiaries, employee_children,
    employee_educations, employee_languages, employees, employments, funding_allocations,
    leave_balances, leave_types, positions,
};

/// Error types for safe delete and recycle-bin operations.
#[derive(Debug, thiserror::Error)]
pub enum SafeDeleteError {
    /// Root row does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Blocking dependents exist.
    #[error("{0}")]
    Blocked(DeletionBlocked),

    /// No manifest under that deletion key.
    #[error("Recycle bin entry not found")]
    ManifestNotFound,

    /// A restored row collides with live data.
    #[error("Cannot restore: {0}")]
    RestoreConflict(String),

    /// Manifest payload cannot be replayed.
    #[error("Recycle bin entry is corrupt: {0}")]
    CorruptSnapshot(String),

    /// Snapshot (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Manifest listing row without the snapshot payload.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    /// Manifest id.
    pub id: i32,
    /// Recycle-bin key.
    pub deletion_key: String,
    /// Entity kind.
    pub entity_type: String,
    /// Deleted root id.
    pub entity_id: i32,
    /// Human label of the root.
    pub entity_label: String,
    /// Reason given at deletion.
    pub reason: Option<String>,
    /// Rows held, root included.
    pub snapshot_count: i32,
    /// Deleting user.
    pub deleted_by: Option<i32>,
    /// Deletion time.
    pub deleted_at: chrono::DateTime<Utc>,
}

impl From<deletion_manifests::Model> for ManifestSummary {
    fn from(model: deletion_manifests::Model) -> Self {
        Self {
            id: model.id,
            deletion_key: model.deletion_key,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            entity_label: model.entity_label,
            reason: model.reason,
            snapshot_count: model.snapshot_count,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
        }
    }
}

/// What a restore brought back.
#[derive(Debug, Clone, Serialize)]
pub struct RestoredEntity {
    /// Entity kind.
    pub entity_type: String,
    /// Restored root id.
    pub entity_id: i32,
    /// Human label of the root.
    pub entity_label: String,
    /// Rows re-inserted, root included.
    pub restored_rows: usize,
}

/// Runs `$body` with `$entity` bound to the entity module of `$table`.
macro_rules! with_table {
    ($table:expr, $entity:ident => $body:block) => {
        match $table {
            "employees" => {
                use crate::entities::employees as $entity;
                $body
            }
            "employments" => {
                use crate::entities::employments as $entity;
                $body
            }
            "employee_languages" => {
                use crate::entities::employee_languages as $entity;
                $body
            }
            "employee_educations" => {
                use crate::entities::employee_educations as $entity;
                $body
            }
            "employee_children" => {
                use crate::entities::employee_children as $entity;
                $body
            }
            "employee_beneficiaries" => {
                use crate::entities::employee_beneficiaries as $entity;
                $body
            }
            "funding_allocations" => {
                use crate::entities::funding_allocations as $entity;
                $body
            }
            "departments" => {
                use crate::entities::departments as $entity;
                $body
            }
            "positions" => {
                use crate::entities::positions as $entity;
                $body
            }
            "leave_types" => {
                use crate::entities::leave_types as $entity;
                $body
            }
            "leave_balances" => {
                use crate::entities::leave_balances as $entity;
                $body
            }
            other => {
                return Err(SafeDeleteError::CorruptSnapshot(format!(
                    "unknown table `{other}`"
                )));
            }
        }
    };
}

async fn to_rows<C, E>(conn: &C, select: Select<E>) -> Result<Vec<Value>, SafeDeleteError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Serialize,
{
    let models = select.all(conn).await?;
    Ok(models
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?)
}

fn running_employments(today: NaiveDate) -> Condition {
    Condition::any()
        .add(employments::Column::EndDate.is_null())
        .add(employments::Column::EndDate.gte(today))
}

/// Rows of `dependent` hanging off entity `id`.
async fn dependent_rows<C: ConnectionTrait>(
    conn: &C,
    dependent: Dependent,
    id: i32,
    today: NaiveDate,
) -> Result<Vec<Value>, SafeDeleteError> {
    let active = FundingStatus::Active.as_str();
    match dependent {
        Dependent::ActiveFundingAllocations => {
            to_rows(
                conn,
                funding_allocations::Entity::find()
                    .filter(funding_allocations::Column::EmployeeId.eq(id))
                    .filter(funding_allocations::Column::Status.eq(active)),
            )
            .await
        }
        Dependent::InactiveFundingAllocations => {
            to_rows(
                conn,
                funding_allocations::Entity::find()
                    .filter(funding_allocations::Column::EmployeeId.eq(id))
                    .filter(funding_allocations::Column::Status.ne(active)),
            )
            .await
        }
        Dependent::Employment => {
            to_rows(
                conn,
                employments::Entity::find().filter(employments::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::Languages => {
            to_rows(
                conn,
                employee_languages::Entity::find()
                    .filter(employee_languages::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::Educations => {
            to_rows(
                conn,
                employee_educations::Entity::find()
                    .filter(employee_educations::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::Children => {
            to_rows(
                conn,
                employee_children::Entity::find()
                    .filter(employee_children::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::Beneficiaries => {
            to_rows(
                conn,
                employee_beneficiaries::Entity::find()
                    .filter(employee_beneficiaries::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::LeaveBalances => {
            to_rows(
                conn,
                leave_balances::Entity::find().filter(leave_balances::Column::EmployeeId.eq(id)),
            )
            .await
        }
        Dependent::ActivePositions => {
            to_rows(
                conn,
                positions::Entity::find()
                    .filter(positions::Column::DepartmentId.eq(id))
                    .filter(positions::Column::IsActive.eq(true)),
            )
            .await
        }
        Dependent::InactivePositions => {
            to_rows(
                conn,
                positions::Entity::find()
                    .filter(positions::Column::DepartmentId.eq(id))
                    .filter(positions::Column::IsActive.eq(false)),
            )
            .await
        }
        Dependent::ActiveEmployments => {
            to_rows(
                conn,
                employments::Entity::find()
                    .filter(employments::Column::DepartmentId.eq(id))
                    .filter(running_employments(today)),
            )
            .await
        }
        Dependent::PositionEmployments => {
            to_rows(
                conn,
                employments::Entity::find()
                    .filter(employments::Column::PositionId.eq(id))
                    .filter(running_employments(today)),
            )
            .await
        }
        Dependent::ActiveSubordinates => {
            to_rows(
                conn,
                positions::Entity::find()
                    .filter(positions::Column::ReportsToId.eq(id))
                    .filter(positions::Column::IsActive.eq(true)),
            )
            .await
        }
        Dependent::UsedLeaveBalances => {
            to_rows(
                conn,
                leave_balances::Entity::find()
                    .filter(leave_balances::Column::LeaveTypeId.eq(id))
                    .filter(leave_balances::Column::UsedDays.gt(Decimal::ZERO)),
            )
            .await
        }
        Dependent::UnusedLeaveBalances => {
            to_rows(
                conn,
                leave_balances::Entity::find()
                    .filter(leave_balances::Column::LeaveTypeId.eq(id))
                    .filter(leave_balances::Column::UsedDays.lte(Decimal::ZERO)),
            )
            .await
        }
    }
}

/// The root row as JSON plus its human label.
async fn root_row<C: ConnectionTrait>(
    conn: &C,
    kind: EntityKind,
    id: i32,
) -> Result<Option<(Value, String)>, SafeDeleteError> {
    let found = match kind {
        EntityKind::Employee => employees::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| (m.label(), serde_json::to_value(m)))
            .map(|(label, value)| value.map(|v| (v, label))),
        EntityKind::Department => departments::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| (m.name.clone(), serde_json::to_value(m)))
            .map(|(label, value)| value.map(|v| (v, label))),
        EntityKind::Position => positions::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| (m.title.clone(), serde_json::to_value(m)))
            .map(|(label, value)| value.map(|v| (v, label))),
        EntityKind::LeaveType => leave_types::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| (m.name.clone(), serde_json::to_value(m)))
            .map(|(label, value)| value.map(|v| (v, label))),
    };
    Ok(found.transpose()?)
}

/// `(row id, target id)` of live rows whose `link` points at `targets`.
async fn linked_rows<C: ConnectionTrait>(
    conn: &C,
    link: NullableLink,
    targets: &[i32],
) -> Result<Vec<(i32, i32)>, DbErr> {
    let pairs = match link {
        NullableLink::PositionReportsTo => positions::Entity::find()
            .filter(positions::Column::ReportsToId.is_in(targets.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .filter_map(|p| p.reports_to_id.map(|target| (p.id, target)))
            .collect(),
        NullableLink::EmploymentPosition => employments::Entity::find()
            .filter(employments::Column::PositionId.is_in(targets.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .filter_map(|e| e.position_id.map(|target| (e.id, target)))
            .collect(),
        NullableLink::EmploymentDepartment => employments::Entity::find()
            .filter(employments::Column::DepartmentId.is_in(targets.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .filter_map(|e| e.department_id.map(|target| (e.id, target)))
            .collect(),
    };
    Ok(pairs)
}

/// Writes a cleared link back. Rows relinked or removed since are left alone.
async fn relink<C: ConnectionTrait>(conn: &C, detached: &DetachedLink) -> Result<u64, DbErr> {
    let target = Expr::value(detached.target_id);
    let result = match detached.link {
        NullableLink::PositionReportsTo => {
            positions::Entity::update_many()
                .col_expr(positions::Column::ReportsToId, target)
                .filter(positions::Column::Id.eq(detached.row_id))
                .filter(positions::Column::ReportsToId.is_null())
                .exec(conn)
                .await?
        }
        NullableLink::EmploymentPosition => {
            employments::Entity::update_many()
                .col_expr(employments::Column::PositionId, target)
                .filter(employments::Column::Id.eq(detached.row_id))
                .filter(employments::Column::PositionId.is_null())
                .exec(conn)
                .await?
        }
        NullableLink::EmploymentDepartment => {
            employments::Entity::update_many()
                .col_expr(employments::Column::DepartmentId, target)
                .filter(employments::Column::Id.eq(detached.row_id))
                .filter(employments::Column::DepartmentId.is_null())
                .exec(conn)
                .await?
        }
    };
    Ok(result.rows_affected)
}

async fn delete_rows<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    ids: Vec<i32>,
) -> Result<u64, SafeDeleteError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let affected = with_table!(table, entity => {
        entity::Entity::delete_many()
            .filter(entity::Column::Id.is_in(ids))
            .exec(conn)
            .await?
            .rows_affected
    });
    Ok(affected)
}

fn restore_error(err: DbErr, table: &str) -> SafeDeleteError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => SafeDeleteError::RestoreConflict(
            format!("a row in {table} conflicts with existing data ({detail})"),
        ),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => SafeDeleteError::RestoreConflict(
            format!("a row in {table} references data that no longer exists ({detail})"),
        ),
        _ => SafeDeleteError::Database(err),
    }
}

async fn insert_row<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    row: Value,
) -> Result<(), SafeDeleteError> {
    with_table!(table, entity => {
        let model = entity::ActiveModel::from_json(row)
            .map_err(|e| SafeDeleteError::CorruptSnapshot(e.to_string()))?;
        entity::Entity::insert(model)
            .exec(conn)
            .await
            .map_err(|e| restore_error(e, table))?;
    });
    Ok(())
}

/// Orders position rows so managers are inserted before their reports.
fn insertion_order(table: &str, rows: Vec<Value>) -> Vec<Value> {
    if table != "positions" {
        return rows;
    }
    let parent = |row: &Value| row.get("reports_to_id").and_then(Value::as_i64);
    let mut pending = rows;
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let waiting: HashSet<i64> = pending
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .collect();
        let (ready, rest): (Vec<Value>, Vec<Value>) = pending
            .into_iter()
            .partition(|row| parent(row).is_none_or(|p| !waiting.contains(&p)));
        if ready.is_empty() {
            // Cyclic data; keep the remaining order.
            ordered.extend(rest);
            break;
        }
        ordered.extend(ready);
        pending = rest;
    }
    ordered
}

/// Recycle-bin repository: safe delete, restore and purge.
#[derive(Debug, Clone)]
pub struct RecycleBinRepository {
    db: DatabaseConnection,
}

impl RecycleBinRepository {
    /// Creates a new recycle-bin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Deletes an entity and its cascade, keeping a restorable manifest.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing root, `Blocked` when blocking
    /// dependents exist, or a database error. Nothing changes on error.
    pub async fn safe_delete(
        &self,
        kind: EntityKind,
        id: i32,
        reason: Option<String>,
        actor: Option<i32>,
    ) -> Result<deletion_manifests::Model, SafeDeleteError> {
        let today = Utc::now().date_naive();
        let txn = self.db.begin().await?;

        let (root, label) = root_row(&txn, kind, id)
            .await?
            .ok_or(SafeDeleteError::NotFound(kind.label()))?;

        let mut gathered = Vec::with_capacity(kind.dependents().len());
        for &dependent in kind.dependents() {
            let rows = dependent_rows(&txn, dependent, id, today).await?;
            gathered.push((dependent, rows));
        }
        let counts: Vec<(Dependent, u64)> = gathered
            .iter()
            .map(|(d, rows)| (*d, u64::try_from(rows.len()).unwrap_or(u64::MAX)))
            .collect();

        let plan = match DeletionPlan::evaluate(kind, id, &counts) {
            Ok(plan) => plan,
            Err(blocked) => {
                warn!(entity = %kind, entity_id = id, blockers = ?blocked.messages(), "Delete blocked");
                return Err(SafeDeleteError::Blocked(blocked));
            }
        };

        let mut snapshot = Snapshot::new(root);
        for (dependent, rows) in gathered {
            if plan.cascade.iter().any(|(d, _)| *d == dependent) {
                snapshot.push(dependent.table(), rows);
            }
        }

        let removed = snapshot.removed_ids(kind.table()).map_err(|row| {
            SafeDeleteError::CorruptSnapshot(format!("row without an id: {row}"))
        })?;
        for (table, ids) in &removed {
            for link in NullableLink::targeting(table) {
                for (row_id, target_id) in linked_rows(&txn, link, ids).await? {
                    let goes_too = removed
                        .iter()
                        .any(|(t, ids)| t == link.table() && ids.contains(&row_id));
                    if !goes_too {
                        snapshot.detach(link, row_id, target_id);
                    }
                }
            }
        }

        // Dependents first, the root last.
        for (table, ids) in removed.into_iter().rev() {
            delete_rows(&txn, &table, ids).await?;
        }

        let deletion_key = new_deletion_key(kind);
        let snapshot_count = i32::try_from(snapshot.row_count()).unwrap_or(i32::MAX);
        let manifest = deletion_manifests::ActiveModel {
            deletion_key: Set(deletion_key),
            entity_type: Set(kind.as_str().to_string()),
            entity_id: Set(id),
            entity_label: Set(label),
            reason: Set(reason),
            snapshot: Set(serde_json::to_value(&snapshot)?),
            snapshot_count: Set(snapshot_count),
            deleted_by: Set(actor),
            deleted_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            entity = %kind,
            entity_id = id,
            deletion_key = %manifest.deletion_key,
            snapshot_count,
            "Entity moved to recycle bin"
        );
        Ok(manifest)
    }

    /// Safe-deletes each id independently.
    ///
    /// Failures are reported per id; one refusal never rolls back another id.
    pub async fn batch_delete(
        &self,
        kind: EntityKind,
        ids: &[i32],
        reason: Option<&str>,
        actor: Option<i32>,
    ) -> BatchDeleteSummary {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            let outcome = match self
                .safe_delete(kind, id, reason.map(str::to_string), actor)
                .await
            {
                Ok(manifest) => BatchDeleteOutcome::deleted(id, manifest.deletion_key),
                Err(SafeDeleteError::Blocked(blocked)) => {
                    BatchDeleteOutcome::failed(id, blocked.to_string(), blocked.messages())
                }
                Err(err) => {
                    warn!(entity = %kind, entity_id = id, error = %err, "Batch delete item failed");
                    BatchDeleteOutcome::failed(id, err.to_string(), Vec::new())
                }
            };
            results.push(outcome);
        }
        BatchDeleteSummary::new(results)
    }

    /// Lists manifests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        entity_type: Option<EntityKind>,
        page: PageRequest,
    ) -> Result<PageResponse<ManifestSummary>, DbErr> {
        let mut query = deletion_manifests::Entity::find();
        if let Some(kind) = entity_type {
            query = query.filter(deletion_manifests::Column::EntityType.eq(kind.as_str()));
        }
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(deletion_manifests::Column::DeletedAt)
            .order_by_desc(deletion_manifests::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok(PageResponse::new(data, page, total).map(ManifestSummary::from))
    }

    /// Loads a manifest with its snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` when the key is unknown.
    pub async fn find(
        &self,
        deletion_key: &str,
    ) -> Result<deletion_manifests::Model, SafeDeleteError> {
        deletion_manifests::Entity::find()
            .filter(deletion_manifests::Column::DeletionKey.eq(deletion_key))
            .one(&self.db)
            .await?
            .ok_or(SafeDeleteError::ManifestNotFound)
    }

    /// Re-inserts the snapshot and removes the manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound`, `RestoreConflict` when a row collides with
    /// live data, or `CorruptSnapshot`. Nothing changes on error.
    pub async fn restore(
        &self,
        deletion_key: &str,
    ) -> Result<RestoredEntity, SafeDeleteError> {
        let txn = self.db.begin().await?;
        let manifest = deletion_manifests::Entity::find()
            .filter(deletion_manifests::Column::DeletionKey.eq(deletion_key))
            .one(&txn)
            .await?
            .ok_or(SafeDeleteError::ManifestNotFound)?;
        let kind = EntityKind::parse(&manifest.entity_type).ok_or_else(|| {
            SafeDeleteError::CorruptSnapshot(format!(
                "unknown entity type `{}`",
                manifest.entity_type
            ))
        })?;
        let snapshot: Snapshot = serde_json::from_value(manifest.snapshot.clone())?;
        let restored_rows = snapshot.row_count();

        insert_row(&txn, kind.table(), snapshot.root).await?;
        for group in snapshot.groups {
            for row in insertion_order(&group.table, group.rows) {
                insert_row(&txn, &group.table, row).await?;
            }
        }
        let mut relinked = 0;
        for detached in &snapshot.links {
            relinked += relink(&txn, detached).await?;
        }
        deletion_manifests::Entity::delete_by_id(manifest.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            entity = %kind,
            entity_id = manifest.entity_id,
            deletion_key,
            restored_rows,
            relinked,
            "Entity restored from recycle bin"
        );
        Ok(RestoredEntity {
            entity_type: manifest.entity_type,
            entity_id: manifest.entity_id,
            entity_label: manifest.entity_label,
            restored_rows,
        })
    }

    /// Discards a manifest for good.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` when the key is unknown.
    pub async fn purge(
        &self,
        deletion_key: &str,
    ) -> Result<deletion_manifests::Model, SafeDeleteError> {
        let manifest = self.find(deletion_key).await?;
        deletion_manifests::Entity::delete_by_id(manifest.id)
            .exec(&self.db)
            .await?;
        info!(deletion_key, "Recycle bin entry purged");
        Ok(manifest)
    }
}
