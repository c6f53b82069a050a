//! # Snapshot Repository
//!
//! Point-in-time copies of a schedule and its assignments. A snapshot
//! serializes the full row state as JSON so the schedule can be audited or
//! rolled back later without replaying history.

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule::Entity as Schedule;
use crate::models::schedule_assignment::{
    Column as AssignmentColumn, Entity as ScheduleAssignment,
};
use crate::models::schedule_snapshot::{
    ActiveModel, Column, Entity as ScheduleSnapshot, Model, SnapshotType,
};

/// Repository for snapshot database operations
pub struct SnapshotRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SnapshotRepository<'a> {
    /// Create a new SnapshotRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Capture a snapshot of the schedule and all of its assignments.
    pub async fn capture(
        &self,
        schedule_id: Uuid,
        snapshot_type: SnapshotType,
        created_by: &str,
        description: Option<String>,
    ) -> Result<Model, ApiError> {
        let schedule = Schedule::find_by_id(schedule_id)
            .one(self.db)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Schedule not found")
            })?;

        let assignments = ScheduleAssignment::find()
            .filter(AssignmentColumn::ScheduleId.eq(schedule_id))
            .order_by_asc(AssignmentColumn::SequenceNumber)
            .all(self.db)
            .await?;

        let schedule_data = serde_json::to_value(&schedule).map_err(|e| {
            tracing::error!("Failed to serialize schedule for snapshot: {e}");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to serialize schedule state",
            )
        })?;
        let assignments_data = serde_json::to_value(&assignments).map_err(|e| {
            tracing::error!("Failed to serialize assignments for snapshot: {e}");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to serialize assignment state",
            )
        })?;

        let metrics_data = json!({
            "utilizationRate": schedule.utilization_rate,
            "efficiencyScore": schedule.efficiency_score,
            "onTimeDeliveryRate": schedule.on_time_delivery_rate,
        });

        let id = Uuid::new_v4();
        let snapshot = ActiveModel {
            id: Set(id),
            schedule_id: Set(schedule_id),
            snapshot_code: Set(Some(format!(
                "snap-{}",
                &id.simple().to_string()[..12]
            ))),
            snapshot_type: Set(snapshot_type.as_str().to_string()),
            description: Set(description),
            schedule_data: Set(schedule_data),
            assignments_data: Set(assignments_data),
            metrics_data: Set(Some(metrics_data)),
            version: Set(Some(schedule.version)),
            is_baseline: Set(schedule.is_baseline),
            created_by: Set(created_by.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            metadata: Set(None),
        };

        let created = snapshot.insert(self.db).await?;

        tracing::info!(
            schedule_id = %schedule_id,
            snapshot_id = %created.id,
            snapshot_type = %snapshot_type,
            "Schedule snapshot captured"
        );

        Ok(created)
    }

    /// List snapshots of a schedule, newest first
    pub async fn list_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Model>, ApiError> {
        Ok(ScheduleSnapshot::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await?)
    }
}
