//! Migration to create the schedule_subscriptions table.
//!
//! One row per (schedule, user); the unique constraint is the idempotency
//! guard for concurrent subscribe calls.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::ScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::UserId)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::NotifyOnChanges)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::NotifyOnApproval)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::NotifyOnPublish)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::NotifyOnDiscussion)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::EmailNotifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::InAppNotifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::DigestFrequency)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::SubscribedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::LastNotifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSubscriptions::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_subscriptions_schedule_id")
                            .from(
                                ScheduleSubscriptions::Table,
                                ScheduleSubscriptions::ScheduleId,
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
                    .name("idx_subscriptions_schedule")
                    .table(ScheduleSubscriptions::Table)
                    .col(ScheduleSubscriptions::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user")
                    .table(ScheduleSubscriptions::Table)
                    .col(ScheduleSubscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unq_schedule_user_subscription")
                    .table(ScheduleSubscriptions::Table)
                    .col(ScheduleSubscriptions::ScheduleId)
                    .col(ScheduleSubscriptions::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subscriptions_schedule").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_user").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("unq_schedule_user_subscription")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleSubscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleSubscriptions {
    Table,
    Id,
    ScheduleId,
    UserId,
    NotifyOnChanges,
    NotifyOnApproval,
    NotifyOnPublish,
    NotifyOnDiscussion,
    EmailNotifications,
    InAppNotifications,
    DigestFrequency,
    SubscribedAt,
    LastNotifiedAt,
    Metadata,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
