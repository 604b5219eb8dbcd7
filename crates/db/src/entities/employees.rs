//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization: String,
    pub staff_id: String,
    pub initial_en: Option<String>,
    pub initial_th: Option<String>,
    pub first_name_en: String,
    pub last_name_en: Option<String>,
    pub first_name_th: Option<String>,
    pub last_name_th: Option<String>,
    pub gender: String,
    pub date_of_birth: Date,
    pub status: String,
    pub nationality: Option<String>,
    pub religion: Option<String>,
    pub identification_type: Option<String>,
    pub identification_number: Option<String>,
    pub social_security_number: Option<String>,
    pub tax_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_branch: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub mobile_phone: Option<String>,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub military_status: Option<String>,
    pub marital_status: Option<String>,
    pub spouse_name: Option<String>,
    pub spouse_phone_number: Option<String>,
    pub emergency_contact_person_name: Option<String>,
    pub emergency_contact_person_relationship: Option<String>,
    pub emergency_contact_person_phone: Option<String>,
    pub father_name: Option<String>,
    pub father_occupation: Option<String>,
    pub father_phone_number: Option<String>,
    pub mother_name: Option<String>,
    pub mother_occupation: Option<String>,
    pub mother_phone_number: Option<String>,
    pub driver_license_number: Option<String>,
    pub remark: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Staff id and English name, used in messages.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {}",
            self.staff_id,
            hrms_core::employee::display_name(&self.first_name_en, self.last_name_en.as_deref())
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::employments::Entity")]
    Employment,
    #[sea_orm(has_many = "super::employee_languages::Entity")]
    Languages,
    #[sea_orm(has_many = "super::employee_educations::Entity")]
    Educations,
    #[sea_orm(has_many = "super::employee_children::Entity")]
    Children,
    #[sea_orm(has_many = "super::employee_beneficiaries::Entity")]
    Beneficiaries,
    #[sea_orm(has_many = "super::leave_balances::Entity")]
    LeaveBalances,
    #[sea_orm(has_many = "super::funding_allocations::Entity")]
    FundingAllocations,
}

impl Related<super::employments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employment.def()
    }
}

impl Related<super::employee_languages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Languages.def()
    }
}

impl Related<super::employee_educations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Educations.def()
    }
}

impl Related<super::employee_children::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Children.def()
    }
}

impl Related<super::employee_beneficiaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beneficiaries.def()
    }
}

impl Related<super::leave_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveBalances.def()
    }
}

impl Related<super::funding_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundingAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
