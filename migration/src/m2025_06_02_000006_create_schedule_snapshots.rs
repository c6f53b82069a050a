//! Migration to create the schedule_snapshots table.
//!
//! Point-in-time serialized copies of a schedule and its assignments for
//! audit and rollback.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::ScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::SnapshotCode)
                            .text()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::SnapshotType)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleSnapshots::Description).text().null())
                    .col(
                        ColumnDef::new(ScheduleSnapshots::ScheduleData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::AssignmentsData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::MetricsData)
                            .json_binary()
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduleSnapshots::Version).integer().null())
                    .col(
                        ColumnDef::new(ScheduleSnapshots::IsBaseline)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::CreatedBy)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleSnapshots::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_snapshots_schedule_id")
                            .from(ScheduleSnapshots::Table, ScheduleSnapshots::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_snapshots_schedule")
                    .table(ScheduleSnapshots::Table)
                    .col(ScheduleSnapshots::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_snapshots_created")
                    .table(ScheduleSnapshots::Table)
                    .col(ScheduleSnapshots::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_snapshots_schedule").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_snapshots_created").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleSnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleSnapshots {
    Table,
    Id,
    ScheduleId,
    SnapshotCode,
    SnapshotType,
    Description,
    ScheduleData,
    AssignmentsData,
    MetricsData,
    Version,
    IsBaseline,
    CreatedBy,
    CreatedAt,
    Metadata,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
