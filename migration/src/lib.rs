//! Database migrations for the Scheduling API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_02_000001_create_schedules;
mod m2025_06_02_000002_create_schedule_assignments;
mod m2025_06_02_000003_create_schedule_approvals;
mod m2025_06_02_000004_create_schedule_discussions;
mod m2025_06_02_000005_create_schedule_comparisons;
mod m2025_06_02_000006_create_schedule_snapshots;
mod m2025_06_02_000007_create_schedule_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_02_000001_create_schedules::Migration),
            Box::new(m2025_06_02_000002_create_schedule_assignments::Migration),
            Box::new(m2025_06_02_000003_create_schedule_approvals::Migration),
            Box::new(m2025_06_02_000004_create_schedule_discussions::Migration),
            Box::new(m2025_06_02_000005_create_schedule_comparisons::Migration),
            Box::new(m2025_06_02_000006_create_schedule_snapshots::Migration),
            Box::new(m2025_06_02_000007_create_schedule_subscriptions::Migration),
        ]
    }
}
