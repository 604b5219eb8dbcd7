//! Leave types and per-year balances.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000002_employees::Employees;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeaveTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveTypes::Id))
                    .col(string_len_uniq(LeaveTypes::Name, 100))
                    .col(decimal_len(LeaveTypes::DefaultDuration, 6, 2).default(0))
                    .col(text_null(LeaveTypes::Description))
                    .col(boolean(LeaveTypes::RequiresAttachment).default(false))
                    .col(integer_null(LeaveTypes::CreatedBy))
                    .col(integer_null(LeaveTypes::UpdatedBy))
                    .col(timestamp_with_time_zone(LeaveTypes::CreatedAt))
                    .col(timestamp_with_time_zone(LeaveTypes::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveBalances::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveBalances::Id))
                    .col(integer(LeaveBalances::EmployeeId))
                    .col(integer(LeaveBalances::LeaveTypeId))
                    .col(integer(LeaveBalances::Year))
                    .col(decimal_len(LeaveBalances::TotalDays, 6, 2))
                    .col(decimal_len(LeaveBalances::UsedDays, 6, 2).default(0))
                    .col(decimal_len(LeaveBalances::RemainingDays, 6, 2))
                    .col(integer_null(LeaveBalances::CreatedBy))
                    .col(integer_null(LeaveBalances::UpdatedBy))
                    .col(timestamp_with_time_zone(LeaveBalances::CreatedAt))
                    .col(timestamp_with_time_zone(LeaveBalances::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_balances_employee")
                            .from(LeaveBalances::Table, LeaveBalances::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_balances_leave_type")
                            .from(LeaveBalances::Table, LeaveBalances::LeaveTypeId)
                            .to(LeaveTypes::Table, LeaveTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_leave_balances_employee_type_year")
                    .table(LeaveBalances::Table)
                    .col(LeaveBalances::EmployeeId)
                    .col(LeaveBalances::LeaveTypeId)
                    .col(LeaveBalances::Year)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaveBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LeaveTypes {
    Table,
    Id,
    Name,
    DefaultDuration,
    Description,
    RequiresAttachment,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeaveBalances {
    Table,
    Id,
    EmployeeId,
    LeaveTypeId,
    Year,
    TotalDays,
    UsedDays,
    RemainingDays,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
