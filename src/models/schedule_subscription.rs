//! ScheduleSubscription entity model
//!
//! Per-user notification preferences for a schedule, unique per
//! (schedule_id, user_id).

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub schedule_id: Uuid,
    pub user_id: String,

    pub notify_on_changes: bool,
    pub notify_on_approval: bool,
    pub notify_on_publish: bool,
    pub notify_on_discussion: bool,

    pub email_notifications: bool,
    pub in_app_notifications: bool,

    /// immediate, hourly, or daily
    pub digest_frequency: Option<String>,

    pub subscribed_at: DateTimeWithTimeZone,
    pub last_notified_at: Option<DateTimeWithTimeZone>,

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
}

impl Related<Schedule> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
