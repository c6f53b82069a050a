//! Migration to create the schedule_discussions table.
//!
//! Threaded comments on a schedule; replies self-reference through
//! parent_discussion_id and cascade with their root.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleDiscussions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleDiscussions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::ScheduleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::ParentDiscussionId)
                            .uuid()
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduleDiscussions::ThreadId).text().null())
                    .col(ColumnDef::new(ScheduleDiscussions::UserId).text().not_null())
                    .col(ColumnDef::new(ScheduleDiscussions::UserName).text().null())
                    .col(ColumnDef::new(ScheduleDiscussions::UserRole).text().null())
                    .col(
                        ColumnDef::new(ScheduleDiscussions::Message)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::Attachments)
                            .json_binary()
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduleDiscussions::ContextType).text().null())
                    .col(ColumnDef::new(ScheduleDiscussions::ContextId).text().null())
                    .col(
                        ColumnDef::new(ScheduleDiscussions::ContextData)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::IsResolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ScheduleDiscussions::ResolvedBy).text().null())
                    .col(
                        ColumnDef::new(ScheduleDiscussions::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::Mentions)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::IsAnnouncement)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::EditedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleDiscussions::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_discussions_schedule_id")
                            .from(ScheduleDiscussions::Table, ScheduleDiscussions::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_discussions_parent_id")
                            .from(
                                ScheduleDiscussions::Table,
                                ScheduleDiscussions::ParentDiscussionId,
                            )
                            .to(ScheduleDiscussions::Table, ScheduleDiscussions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_discussions_schedule")
                    .table(ScheduleDiscussions::Table)
                    .col(ScheduleDiscussions::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_discussions_user")
                    .table(ScheduleDiscussions::Table)
                    .col(ScheduleDiscussions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_discussions_thread")
                    .table(ScheduleDiscussions::Table)
                    .col(ScheduleDiscussions::ThreadId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_discussions_context")
                    .table(ScheduleDiscussions::Table)
                    .col(ScheduleDiscussions::ContextType)
                    .col(ScheduleDiscussions::ContextId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_discussions_schedule").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_discussions_user").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_discussions_thread").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_discussions_context").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ScheduleDiscussions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduleDiscussions {
    Table,
    Id,
    ScheduleId,
    ParentDiscussionId,
    ThreadId,
    UserId,
    UserName,
    UserRole,
    Message,
    Attachments,
    ContextType,
    ContextId,
    ContextData,
    IsResolved,
    ResolvedBy,
    ResolvedAt,
    Mentions,
    IsAnnouncement,
    IsPinned,
    CreatedAt,
    EditedAt,
    Metadata,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
}
