//! ScheduleDiscussion entity model
//!
//! Threaded comments on a schedule or one of its sub-contexts. Replies
//! self-reference through `parent_discussion_id`.

use std::fmt;

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_discussions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub schedule_id: Uuid,

    /// Parent message when this row is a reply
    pub parent_discussion_id: Option<Uuid>,

    /// Groups a root message and all its replies
    pub thread_id: Option<String>,

    pub user_id: String,
    pub user_name: Option<String>,
    pub user_role: Option<String>,

    pub message: String,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub attachments: Option<JsonValue>,

    /// What part of the schedule is being discussed (see [`ContextType`])
    pub context_type: Option<String>,

    pub context_id: Option<String>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub context_data: Option<JsonValue>,

    pub is_resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// User ids mentioned in the message
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub mentions: Option<JsonValue>,

    pub is_announcement: bool,
    pub is_pinned: bool,

    pub created_at: DateTimeWithTimeZone,
    pub edited_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<JsonValue>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Schedule",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentDiscussionId",
        to = "Column::Id"
    )]
    Parent,
}

impl Related<Schedule> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Discussion context registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextType {
    Assignment,
    Resource,
    General,
}

impl ContextType {
    pub const ALL: &'static [ContextType] =
        &[ContextType::Assignment, ContextType::Resource, ContextType::General];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContextType::Assignment => "assignment",
            ContextType::Resource => "resource",
            ContextType::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<ContextType> {
        ContextType::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
