//! Users, lookups, departments and positions.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len_uniq(Users::Email, 255))
                    .col(string_len(Users::PasswordHash, 255))
                    .col(string_len(Users::Name, 255))
                    .col(string_len(Users::Role, 50))
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lookups::Table)
                    .if_not_exists()
                    .col(pk_auto(Lookups::Id))
                    .col(string_len(Lookups::Type, 50))
                    .col(string_len(Lookups::Value, 255))
                    .col(integer_null(Lookups::CreatedBy))
                    .col(integer_null(Lookups::UpdatedBy))
                    .col(timestamp_with_time_zone(Lookups::CreatedAt))
                    .col(timestamp_with_time_zone(Lookups::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_lookups_type_value")
                    .table(Lookups::Table)
                    .col(Lookups::Type)
                    .col(Lookups::Value)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk_auto(Departments::Id))
                    .col(string_len_uniq(Departments::Name, 255))
                    .col(text_null(Departments::Description))
                    .col(boolean(Departments::IsActive).default(true))
                    .col(integer_null(Departments::CreatedBy))
                    .col(integer_null(Departments::UpdatedBy))
                    .col(timestamp_with_time_zone(Departments::CreatedAt))
                    .col(timestamp_with_time_zone(Departments::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(pk_auto(Positions::Id))
                    .col(string_len(Positions::Title, 255))
                    .col(integer(Positions::DepartmentId))
                    .col(integer_null(Positions::ReportsToId))
                    .col(integer(Positions::Level).default(1))
                    .col(boolean(Positions::IsManager).default(false))
                    .col(boolean(Positions::IsActive).default(true))
                    .col(integer_null(Positions::CreatedBy))
                    .col(integer_null(Positions::UpdatedBy))
                    .col(timestamp_with_time_zone(Positions::CreatedAt))
                    .col(timestamp_with_time_zone(Positions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_department")
                            .from(Positions::Table, Positions::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_reports_to")
                            .from(Positions::Table, Positions::ReportsToId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_positions_department")
                    .table(Positions::Table)
                    .col(Positions::DepartmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lookups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Lookups {
    Table,
    Id,
    Type,
    Value,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Departments {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Positions {
    Table,
    Id,
    Title,
    DepartmentId,
    ReportsToId,
    Level,
    IsManager,
    IsActive,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
