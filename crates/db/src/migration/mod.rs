//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder so the same set runs on PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_organization;
mod m20260301_000002_employees;
mod m20260301_000003_leave;
mod m20260301_000004_recycle_bin;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_organization::Migration),
            Box::new(m20260301_000002_employees::Migration),
            Box::new(m20260301_000003_leave::Migration),
            Box::new(m20260301_000004_recycle_bin::Migration),
        ]
    }
}
