//! ScheduleSnapshot entity model
//!
//! Point-in-time serialized copy of a schedule and its assignments, kept for
//! audit and rollback.

use std::fmt;

use super::schedule::Entity as Schedule;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub schedule_id: Uuid,

    pub snapshot_code: Option<String>,

    /// What produced the snapshot (see [`SnapshotType`])
    pub snapshot_type: String,

    pub description: Option<String>,

    /// Serialized schedule row at snapshot time
    #[sea_orm(column_type = "JsonBinary")]
    pub schedule_data: JsonValue,

    /// Serialized assignment rows at snapshot time
    #[sea_orm(column_type = "JsonBinary")]
    pub assignments_data: JsonValue,

    /// Performance metrics at snapshot time
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metrics_data: Option<JsonValue>,

    pub version: Option<i32>,
    pub is_baseline: bool,

    pub created_by: String,
    pub created_at: DateTimeWithTimeZone,

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

/// What triggered a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotType {
    Auto,
    Manual,
    Approval,
    Publish,
}

impl SnapshotType {
    pub const ALL: &'static [SnapshotType] = &[
        SnapshotType::Auto,
        SnapshotType::Manual,
        SnapshotType::Approval,
        SnapshotType::Publish,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SnapshotType::Auto => "auto",
            SnapshotType::Manual => "manual",
            SnapshotType::Approval => "approval",
            SnapshotType::Publish => "publish",
        }
    }

    pub fn parse(value: &str) -> Option<SnapshotType> {
        SnapshotType::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
