//! ScheduleComparison entity model
//!
//! A computed diff between two schedule versions. Rows are derived data:
//! recomputed from the assignment sets, never hand-edited.

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_comparisons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub comparison_code: Option<String>,
    pub name: String,

    pub base_schedule_id: Uuid,
    pub compare_schedule_id: Uuid,

    pub total_changes: Option<i32>,
    pub resource_changes: Option<i32>,
    pub timing_changes: Option<i32>,
    pub sequence_changes: Option<i32>,

    pub utilization_delta: Option<f32>,
    pub efficiency_delta: Option<f32>,
    pub on_time_delta: Option<f32>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub comparison_data: Option<JsonValue>,

    /// Key differences worth surfacing first
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub highlights: Option<JsonValue>,

    pub created_by: String,
    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<JsonValue>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Schedule",
        from = "Column::BaseScheduleId",
        to = "super::schedule::Column::Id"
    )]
    BaseSchedule,
    #[sea_orm(
        belongs_to = "Schedule",
        from = "Column::CompareScheduleId",
        to = "super::schedule::Column::Id"
    )]
    CompareSchedule,
}

impl ActiveModelBehavior for ActiveModel {}
