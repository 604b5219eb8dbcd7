//! Safe deletion: dependency rules, delete plans and recycle-bin snapshots.
//!
//! # Modules
//!
//! - `rules` - Which dependents block a delete and which move with it
//! - `plan` - Turning dependent counts into blockers or a cascade plan
//! - `snapshot` - Serialized rows kept in the recycle bin
//! - `batch` - Per-id outcomes for batch deletes

pub mod batch;
pub mod plan;
pub mod rules;
pub mod snapshot;

pub use batch::{BatchDeleteOutcome, BatchDeleteSummary, BatchStatus};
pub use plan::{Blocker, DeletionBlocked, DeletionPlan};
pub use rules::{Dependent, EntityKind, NullableLink};
pub use snapshot::{DetachedLink, Snapshot, SnapshotGroup, new_deletion_key};
