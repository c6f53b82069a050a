//! Migration to create the schedule_assignments table.
//!
//! Assignments are owned by their schedule version and cascade away with it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::ScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::AssignmentType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::AssignmentId)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::AssignmentName)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduleAssignments::ResourceId).text().null())
                    .col(
                        ColumnDef::new(ScheduleAssignments::ResourceName)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::AlternateResourceId)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::PlannedStartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::PlannedEndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::ActualStartTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::ActualEndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::PlannedDuration)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::ActualDuration)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::PlannedQuantity)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::ActualQuantity)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::SequenceNumber)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Priority)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::IsManuallyScheduled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Status)
                            .text()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::CompletionPercentage)
                            .float()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Predecessors)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Successors)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Constraints)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduleAssignments::Notes).text().null())
                    .col(
                        ColumnDef::new(ScheduleAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleAssignments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_assignments_schedule_id")
                            .from(ScheduleAssignments::Table, ScheduleAssignments::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_assignments_schedule")
                    .table(ScheduleAssignments::Table)
                    .col(ScheduleAssignments::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_assignments_resource")
                    .table(ScheduleAssignments::Table)
                    .col(ScheduleAssignments::ResourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_assignments_dates")
                    .table(ScheduleAssignments::Table)
                    .col(ScheduleAssignments::PlannedStartTime)
                    .col(ScheduleAssignments::PlannedEndTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_assignments_type")
                    .table(ScheduleAssignments::Table)
                    .col(ScheduleAssignments::AssignmentType)
                    .col(ScheduleAssignments::AssignmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedule_assignments_schedule")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedule_assignments_resource")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedule_assignments_dates")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedule_assignments_type")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleAssignments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleAssignments {
    Table,
    Id,
    ScheduleId,
    AssignmentType,
    AssignmentId,
    AssignmentName,
    ResourceId,
    ResourceName,
    AlternateResourceId,
    PlannedStartTime,
    PlannedEndTime,
    ActualStartTime,
    ActualEndTime,
    PlannedDuration,
    ActualDuration,
    PlannedQuantity,
    ActualQuantity,
    SequenceNumber,
    Priority,
    IsLocked,
    IsManuallyScheduled,
    Status,
    CompletionPercentage,
    Predecessors,
    Successors,
    Constraints,
    Metadata,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
