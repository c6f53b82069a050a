//! ScheduleAssignment entity model
//!
//! One placed operation within a schedule version. Assignments are owned
//! exclusively by their schedule and cascade away with it.

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "schedule_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning schedule version
    pub schedule_id: Uuid,

    /// Kind of work item being scheduled (operation, order, job)
    pub assignment_type: String,

    /// Identifier of the source work item
    pub assignment_id: String,

    pub assignment_name: Option<String>,

    /// Resource the work is placed on
    pub resource_id: Option<String>,

    pub resource_name: Option<String>,

    /// Fallback resource, when the engine proposed one
    pub alternate_resource_id: Option<String>,

    pub planned_start_time: DateTimeWithTimeZone,
    pub planned_end_time: DateTimeWithTimeZone,
    pub actual_start_time: Option<DateTimeWithTimeZone>,
    pub actual_end_time: Option<DateTimeWithTimeZone>,

    /// Planned duration in minutes
    pub planned_duration: Option<i32>,

    /// Actual duration in minutes
    pub actual_duration: Option<i32>,

    pub planned_quantity: Option<f64>,
    pub actual_quantity: Option<f64>,

    pub sequence_number: Option<i32>,
    pub priority: i32,
    pub is_locked: bool,
    pub is_manually_scheduled: bool,

    pub status: String,
    pub completion_percentage: f32,

    /// Assignment ids this one depends on
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub predecessors: Option<JsonValue>,

    /// Assignment ids depending on this one
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub successors: Option<JsonValue>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub constraints: Option<JsonValue>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<JsonValue>,

    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
