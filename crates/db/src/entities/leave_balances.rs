//! `SeaORM` Entity for leave_balances table.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub total_days: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub used_days: Decimal,
    /// Always `total_days - used_days`.
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_days: Decimal,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::leave_types::Entity",
        from = "Column::LeaveTypeId",
        to = "super::leave_types::Column::Id"
    )]
    LeaveType,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::leave_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
