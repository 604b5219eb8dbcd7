//! Deciding whether a delete may proceed.

use std::fmt;

use serde::Serialize;

use super::rules::{Dependent, EntityKind};

/// One reason a delete was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    /// Dependent class.
    pub dependent: Dependent,
    /// Table holding the rows.
    pub table: &'static str,
    /// Number of blocking rows.
    pub count: u64,
    /// Human description.
    pub message: String,
}

/// A refused delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionBlocked {
    /// Entity kind.
    pub entity: EntityKind,
    /// Entity id.
    pub entity_id: i32,
    /// Every blocking dependent.
    pub blockers: Vec<Blocker>,
}

impl DeletionBlocked {
    /// Blocker messages in rule order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.blockers.iter().map(|b| b.message.clone()).collect()
    }
}

impl fmt::Display for DeletionBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot delete {} {}: it still has {}.",
            self.entity.label(),
            self.entity_id,
            self.messages().join(", ")
        )
    }
}

impl std::error::Error for DeletionBlocked {}

/// An approved delete and the rows that move with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Entity kind.
    pub entity: EntityKind,
    /// Entity id.
    pub entity_id: i32,
    /// Non-empty cascade groups with their row counts.
    pub cascade: Vec<(Dependent, u64)>,
}

impl DeletionPlan {
    /// Evaluates dependent counts gathered for one entity.
    ///
    /// `counts` holds a row count per entry of [`EntityKind::dependents`];
    /// missing entries count as zero.
    ///
    /// # Errors
    ///
    /// Returns [`DeletionBlocked`] listing every blocking dependent with rows.
    pub fn evaluate(
        entity: EntityKind,
        entity_id: i32,
        counts: &[(Dependent, u64)],
    ) -> Result<Self, DeletionBlocked> {
        let count_of = |dependent: Dependent| {
            counts
                .iter()
                .filter(|(d, _)| *d == dependent)
                .map(|(_, c)| *c)
                .sum::<u64>()
        };

        let mut blockers = Vec::new();
        let mut cascade = Vec::new();
        for &dependent in entity.dependents() {
            let count = count_of(dependent);
            if count == 0 {
                continue;
            }
            if dependent.is_blocking() {
                blockers.push(Blocker {
                    dependent,
                    table: dependent.table(),
                    count,
                    message: format!("{count} {}", dependent.label()),
                });
            } else {
                cascade.push((dependent, count));
            }
        }

        if blockers.is_empty() {
            Ok(Self {
                entity,
                entity_id,
                cascade,
            })
        } else {
            Err(DeletionBlocked {
                entity,
                entity_id,
                blockers,
            })
        }
    }

    /// Rows the manifest will hold: the cascade plus the root.
    #[must_use]
    pub fn snapshot_count(&self) -> u64 {
        self.cascade.iter().map(|(_, c)| c).sum::<u64>() + 1
    }
}
