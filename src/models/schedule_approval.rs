//! ScheduleApproval entity model
//!
//! One approval-workflow step for a schedule version. The database enforces
//! uniqueness on (schedule_id, approver_id, approval_level) so concurrent
//! duplicate slots fail one of the writers.

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub schedule_id: Uuid,

    /// Level in the approval hierarchy (1 = first gate)
    pub approval_level: i32,

    /// Ordering among approvers at the same level
    pub approval_sequence: Option<i32>,

    pub approver_id: String,
    pub approver_name: Option<String>,
    pub approver_role: Option<String>,

    /// User the decision was delegated to, if any
    pub delegated_to: Option<String>,

    /// Per-approver status, same vocabulary as the schedule approval status
    pub status: String,

    /// Recorded decision: approve, reject, request_changes
    pub decision: Option<String>,

    pub comments: Option<String>,

    /// Conditions attached to a conditional approval
    pub conditions: Option<String>,

    pub requested_at: DateTimeWithTimeZone,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub escalated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub attachments: Option<JsonValue>,

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
