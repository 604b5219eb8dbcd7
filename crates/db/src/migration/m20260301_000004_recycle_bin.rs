//! Recycle-bin manifests, import jobs and notifications.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeletionManifests::Table)
                    .if_not_exists()
                    .col(pk_auto(DeletionManifests::Id))
                    .col(string_len_uniq(DeletionManifests::DeletionKey, 100))
                    .col(string_len(DeletionManifests::EntityType, 50))
                    .col(integer(DeletionManifests::EntityId))
                    .col(string_len(DeletionManifests::EntityLabel, 255))
                    .col(text_null(DeletionManifests::Reason))
                    .col(json(DeletionManifests::Snapshot))
                    .col(integer(DeletionManifests::SnapshotCount))
                    .col(integer_null(DeletionManifests::DeletedBy))
                    .col(timestamp_with_time_zone(DeletionManifests::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deletion_manifests_entity")
                    .table(DeletionManifests::Table)
                    .col(DeletionManifests::EntityType)
                    .col(DeletionManifests::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ImportJobs::Table)
                    .if_not_exists()
                    .col(pk_auto(ImportJobs::Id))
                    .col(string_len_uniq(ImportJobs::ImportId, 64))
                    .col(string_len(ImportJobs::FileName, 255))
                    .col(string_len(ImportJobs::Status, 20))
                    .col(integer(ImportJobs::TotalRows).default(0))
                    .col(integer(ImportJobs::ProcessedCount).default(0))
                    .col(integer(ImportJobs::ImportedCount).default(0))
                    .col(json(ImportJobs::Errors))
                    .col(json(ImportJobs::Warnings))
                    .col(text_null(ImportJobs::Message))
                    .col(integer_null(ImportJobs::CreatedBy))
                    .col(timestamp_with_time_zone(ImportJobs::CreatedAt))
                    .col(timestamp_with_time_zone(ImportJobs::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk_auto(Notifications::Id))
                    .col(string_len(Notifications::Action, 20))
                    .col(string_len(Notifications::EntityType, 50))
                    .col(integer_null(Notifications::EntityId))
                    .col(text(Notifications::Message))
                    .col(integer_null(Notifications::ActorId))
                    .col(timestamp_with_time_zone_null(Notifications::ReadAt))
                    .col(timestamp_with_time_zone(Notifications::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ImportJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeletionManifests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeletionManifests {
    Table,
    Id,
    DeletionKey,
    EntityType,
    EntityId,
    EntityLabel,
    Reason,
    Snapshot,
    SnapshotCount,
    DeletedBy,
    DeletedAt,
}

#[derive(DeriveIden)]
enum ImportJobs {
    Table,
    Id,
    ImportId,
    FileName,
    Status,
    TotalRows,
    ProcessedCount,
    ImportedCount,
    Errors,
    Warnings,
    Message,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Action,
    EntityType,
    EntityId,
    Message,
    ActorId,
    ReadAt,
    CreatedAt,
}
