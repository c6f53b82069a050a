//! Migration to create the schedule_approvals table.
//!
//! The unique constraint on (schedule_id, approver_id, approval_level) is the
//! concurrency control for duplicate approval slots: one of two concurrent
//! writers fails with a unique violation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleApprovals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::ScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::ApprovalLevel)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::ApprovalSequence)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::ApproverId)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleApprovals::ApproverName).text().null())
                    .col(ColumnDef::new(ScheduleApprovals::ApproverRole).text().null())
                    .col(ColumnDef::new(ScheduleApprovals::DelegatedTo).text().null())
                    .col(
                        ColumnDef::new(ScheduleApprovals::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ScheduleApprovals::Decision).text().null())
                    .col(ColumnDef::new(ScheduleApprovals::Comments).text().null())
                    .col(ColumnDef::new(ScheduleApprovals::Conditions).text().null())
                    .col(
                        ColumnDef::new(ScheduleApprovals::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::EscalatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::Attachments)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleApprovals::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_approvals_schedule_id")
                            .from(ScheduleApprovals::Table, ScheduleApprovals::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_approvals_schedule")
                    .table(ScheduleApprovals::Table)
                    .col(ScheduleApprovals::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_approvals_approver")
                    .table(ScheduleApprovals::Table)
                    .col(ScheduleApprovals::ApproverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_approvals_status")
                    .table(ScheduleApprovals::Table)
                    .col(ScheduleApprovals::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unq_schedule_approver_level")
                    .table(ScheduleApprovals::Table)
                    .col(ScheduleApprovals::ScheduleId)
                    .col(ScheduleApprovals::ApproverId)
                    .col(ScheduleApprovals::ApprovalLevel)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_approvals_schedule").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_approvals_approver").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_approvals_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("unq_schedule_approver_level").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleApprovals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleApprovals {
    Table,
    Id,
    ScheduleId,
    ApprovalLevel,
    ApprovalSequence,
    ApproverId,
    ApproverName,
    ApproverRole,
    DelegatedTo,
    Status,
    Decision,
    Comments,
    Conditions,
    RequestedAt,
    ReviewedAt,
    DueDate,
    EscalatedAt,
    Attachments,
    Metadata,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
