//! `SeaORM` Entity for deletion_manifests table.
//!
//! A manifest is written once by safe delete and removed on restore or
//! purge. It is never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deletion_manifests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub deletion_key: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub entity_label: String,
    pub reason: Option<String>,
    /// Serialized `hrms_core::deletion::Snapshot`.
    pub snapshot: Json,
    pub snapshot_count: i32,
    pub deleted_by: Option<i32>,
    pub deleted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
