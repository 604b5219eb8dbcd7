//! `SeaORM` Entity for import_jobs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "import_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub import_id: String,
    pub file_name: String,
    /// `queued`, `processing`, `completed` or `failed`.
    pub status: String,
    pub total_rows: i32,
    pub processed_count: i32,
    pub imported_count: i32,
    pub errors: Json,
    pub warnings: Json,
    pub message: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
