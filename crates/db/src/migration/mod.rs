//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The `auth` schema objects
//! are only created when the hosted database does not already provide them.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_auth_schema;
mod m20250101_000002_tables;
mod m20250101_000003_rls_policies;
mod m20250101_000004_profile_trigger;
mod m20250301_000001_unique_monthly_goal;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_auth_schema::Migration),
            Box::new(m20250101_000002_tables::Migration),
            Box::new(m20250101_000003_rls_policies::Migration),
            Box::new(m20250101_000004_profile_trigger::Migration),
            Box::new(m20250301_000001_unique_monthly_goal::Migration),
        ]
    }
}
