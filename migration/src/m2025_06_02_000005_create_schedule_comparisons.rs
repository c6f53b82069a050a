//! Migration to create the schedule_comparisons table.
//!
//! Derived diffs between two schedule versions; rows cascade with either
//! side of the comparison.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleComparisons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleComparisons::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::ComparisonCode)
                            .text()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ScheduleComparisons::Name).text().not_null())
                    .col(
                        ColumnDef::new(ScheduleComparisons::BaseScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::CompareScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::TotalChanges)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::ResourceChanges)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::TimingChanges)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::SequenceChanges)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::UtilizationDelta)
                            .float()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::EfficiencyDelta)
                            .float()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::OnTimeDelta)
                            .float()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::ComparisonData)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::Highlights)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::CreatedBy)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleComparisons::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_comparisons_base_schedule_id")
                            .from(
                                ScheduleComparisons::Table,
                                ScheduleComparisons::BaseScheduleId,
                            )
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_comparisons_compare_schedule_id")
                            .from(
                                ScheduleComparisons::Table,
                                ScheduleComparisons::CompareScheduleId,
                            )
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comparisons_schedules")
                    .table(ScheduleComparisons::Table)
                    .col(ScheduleComparisons::BaseScheduleId)
                    .col(ScheduleComparisons::CompareScheduleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_comparisons_schedules").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleComparisons::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleComparisons {
    Table,
    Id,
    ComparisonCode,
    Name,
    BaseScheduleId,
    CompareScheduleId,
    TotalChanges,
    ResourceChanges,
    TimingChanges,
    SequenceChanges,
    UtilizationDelta,
    EfficiencyDelta,
    OnTimeDelta,
    ComparisonData,
    Highlights,
    CreatedBy,
    CreatedAt,
    Metadata,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
