//! Migration to create the schedules table.
//!
//! One row per schedule version; lineages link through parent_schedule_id.
//! The self-referencing foreign key uses SET NULL so deleting an old version
//! keeps its descendants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Schedules::ScheduleCode)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schedules::Name).text().not_null())
                    .col(ColumnDef::new(Schedules::Description).text().null())
                    .col(ColumnDef::new(Schedules::ScheduleType).text().not_null())
                    .col(ColumnDef::new(Schedules::ScopeId).text().null())
                    .col(ColumnDef::new(Schedules::ScopeName).text().null())
                    .col(
                        ColumnDef::new(Schedules::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Schedules::ParentScheduleId).uuid().null())
                    .col(
                        ColumnDef::new(Schedules::IsBaseline)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Schedules::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::ScheduleHorizonDays)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::Status)
                            .text()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Schedules::ApprovalStatus)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Schedules::CreatedBy).text().not_null())
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Schedules::ModifiedBy).text().null())
                    .col(
                        ColumnDef::new(Schedules::ModifiedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Schedules::ApprovedBy).text().null())
                    .col(
                        ColumnDef::new(Schedules::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Schedules::UtilizationRate).float().null())
                    .col(ColumnDef::new(Schedules::EfficiencyScore).float().null())
                    .col(ColumnDef::new(Schedules::OnTimeDeliveryRate).float().null())
                    .col(ColumnDef::new(Schedules::Parameters).json_binary().null())
                    .col(ColumnDef::new(Schedules::Metadata).json_binary().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_parent_schedule_id")
                            .from(Schedules::Table, Schedules::ParentScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_status")
                    .table(Schedules::Table)
                    .col(Schedules::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_type")
                    .table(Schedules::Table)
                    .col(Schedules::ScheduleType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_dates")
                    .table(Schedules::Table)
                    .col(Schedules::StartDate)
                    .col(Schedules::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_scope")
                    .table(Schedules::Table)
                    .col(Schedules::ScheduleType)
                    .col(Schedules::ScopeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_schedules_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedules_type").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedules_dates").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedules_scope").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
    ScheduleCode,
    Name,
    Description,
    ScheduleType,
    ScopeId,
    ScopeName,
    Version,
    ParentScheduleId,
    IsBaseline,
    StartDate,
    EndDate,
    ScheduleHorizonDays,
    Status,
    ApprovalStatus,
    CreatedBy,
    CreatedAt,
    ModifiedBy,
    ModifiedAt,
    ApprovedBy,
    ApprovedAt,
    PublishedAt,
    UtilizationRate,
    EfficiencyScore,
    OnTimeDeliveryRate,
    Parameters,
    Metadata,
}
