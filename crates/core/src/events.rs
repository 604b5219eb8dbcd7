//! Domain events raised by mutations.
//!
//! Handlers publish an event after a successful write; a subscriber turns
//! it into a stored notification. Persistence never waits on delivery.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Row inserted.
    Created,
    /// Row changed.
    Updated,
    /// Row moved to the recycle bin or removed.
    Deleted,
    /// Row brought back from the recycle bin.
    Restored,
    /// Recycle-bin entry discarded for good.
    Purged,
    /// Rows added by a spreadsheet import.
    Imported,
}

impl EventAction {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Restored => "restored",
            Self::Purged => "purged",
            Self::Imported => "imported",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation worth telling people about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Action taken.
    pub action: EventAction,
    /// Entity type in snake_case, e.g. `leave_balance`.
    pub entity: String,
    /// Entity id, when a single row is concerned.
    pub entity_id: Option<i32>,
    /// Human label of the entity (name, staff id, ...).
    pub label: String,
    /// Acting user.
    pub actor_id: Option<i32>,
    /// When the mutation committed.
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    /// Builds an event stamped now.
    #[must_use]
    pub fn new(
        action: EventAction,
        entity: impl Into<String>,
        entity_id: Option<i32>,
        label: impl Into<String>,
        actor_id: Option<i32>,
    ) -> Self {
        Self {
            action,
            entity: entity.into(),
            entity_id,
            label: label.into(),
            actor_id,
            occurred_at: Utc::now(),
        }
    }

    /// Notification text, e.g. `Employee "0042 Aye Mya" was created.`
    #[must_use]
    pub fn message(&self) -> String {
        let entity = self.entity.replace('_', " ");
        let mut chars = entity.chars();
        let entity = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect::<String>())
            .unwrap_or_default();

        if self.label.is_empty() {
            format!("{entity} was {}.", self.action)
        } else {
            format!("{entity} \"{}\" was {}.", self.label, self.action)
        }
    }
}
