//! Recycle-bin snapshot payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::rules::{EntityKind, NullableLink};

/// Rows removed from one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotGroup {
    /// Live table the rows came from.
    pub table: String,
    /// Rows serialized as JSON objects.
    pub rows: Vec<Value>,
}

/// A live row whose link the delete cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachedLink {
    /// Which column was cleared.
    pub link: NullableLink,
    /// Row holding the column.
    pub row_id: i32,
    /// Value before the delete.
    pub target_id: i32,
}

/// Everything a manifest needs to restore a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The deleted root row.
    pub root: Value,
    /// Dependent rows, in deletion order.
    pub groups: Vec<SnapshotGroup>,
    /// Links into deleted rows from rows that stay.
    #[serde(default)]
    pub links: Vec<DetachedLink>,
}

impl Snapshot {
    /// Snapshot of a root row with no dependents yet.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self {
            root,
            groups: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Row ids removed per table, root first.
    ///
    /// # Errors
    ///
    /// Returns the offending row when one has no integer `id`.
    pub fn removed_ids(&self, root_table: &str) -> Result<Vec<(String, Vec<i32>)>, Value> {
        let mut removed = vec![(root_table.to_string(), vec![row_id(&self.root)?])];
        for group in &self.groups {
            let ids = group.rows.iter().map(row_id).collect::<Result<Vec<_>, _>>()?;
            removed.push((group.table.clone(), ids));
        }
        Ok(removed)
    }

    /// Records a link the delete is about to clear.
    pub fn detach(&mut self, link: NullableLink, row_id: i32, target_id: i32) {
        self.links.push(DetachedLink {
            link,
            row_id,
            target_id,
        });
    }

    /// Adds a dependent group, merging with an existing group of the same table.
    pub fn push(&mut self, table: &str, rows: Vec<Value>) {
        if rows.is_empty() {
            return;
        }
        if let Some(group) = self.groups.iter_mut().find(|g| g.table == table) {
            group.rows.extend(rows);
        } else {
            self.groups.push(SnapshotGroup {
                table: table.to_string(),
                rows,
            });
        }
    }

    /// Rows held, root included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        1 + self.groups.iter().map(|g| g.rows.len()).sum::<usize>()
    }
}

fn row_id(row: &Value) -> Result<i32, Value> {
    row.get("id")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| row.clone())
}

/// Fresh recycle-bin key, e.g. `employee_3f2a...`.
#[must_use]
pub fn new_deletion_key(kind: EntityKind) -> String {
    format!("{}_{}", kind.as_str(), Uuid::new_v4().simple())
}
