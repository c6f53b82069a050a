//! # Comparison Repository
//!
//! Computed diffs between two schedule versions. Comparison rows are derived
//! data: recomputing a pair replaces any previous row for it.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule::Entity as Schedule;
use crate::models::schedule_assignment::{
    Column as AssignmentColumn, Entity as ScheduleAssignment, Model as AssignmentModel,
};
use crate::models::schedule_comparison::{
    ActiveModel, Column, Entity as ScheduleComparison, Model,
};

/// Repository for comparison database operations
pub struct ComparisonRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ComparisonRepository<'a> {
    /// Create a new ComparisonRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Compute the diff between two schedule versions and store it,
    /// replacing any previously stored comparison for the same pair.
    pub async fn compute(
        &self,
        base_schedule_id: Uuid,
        compare_schedule_id: Uuid,
        name: String,
        created_by: &str,
    ) -> Result<Model, ApiError> {
        let txn = self.db.begin().await?;

        let base = Schedule::find_by_id(base_schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Base schedule not found")
            })?;
        let compare = Schedule::find_by_id(compare_schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Compare schedule not found",
                )
            })?;

        let base_assignments = ScheduleAssignment::find()
            .filter(AssignmentColumn::ScheduleId.eq(base_schedule_id))
            .all(&txn)
            .await?;
        let compare_assignments = ScheduleAssignment::find()
            .filter(AssignmentColumn::ScheduleId.eq(compare_schedule_id))
            .all(&txn)
            .await?;

        let diff = diff_assignments(&base_assignments, &compare_assignments);

        // Derived data: recompute replaces the previous row for this pair.
        ScheduleComparison::delete_many()
            .filter(Column::BaseScheduleId.eq(base_schedule_id))
            .filter(Column::CompareScheduleId.eq(compare_schedule_id))
            .exec(&txn)
            .await?;

        let id = Uuid::new_v4();
        let comparison = ActiveModel {
            id: Set(id),
            comparison_code: Set(Some(format!("cmp-{}", &id.simple().to_string()[..12]))),
            name: Set(name),
            base_schedule_id: Set(base_schedule_id),
            compare_schedule_id: Set(compare_schedule_id),
            total_changes: Set(Some(diff.total_changes)),
            resource_changes: Set(Some(diff.resource_changes)),
            timing_changes: Set(Some(diff.timing_changes)),
            sequence_changes: Set(Some(diff.sequence_changes)),
            utilization_delta: Set(delta(base.utilization_rate, compare.utilization_rate)),
            efficiency_delta: Set(delta(base.efficiency_score, compare.efficiency_score)),
            on_time_delta: Set(delta(base.on_time_delivery_rate, compare.on_time_delivery_rate)),
            comparison_data: Set(Some(json!({
                "baseVersion": base.version,
                "compareVersion": compare.version,
                "added": diff.added,
                "removed": diff.removed,
            }))),
            highlights: Set(Some(json!(diff.highlights))),
            created_by: Set(created_by.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            metadata: Set(None),
        };
        let stored = comparison.insert(&txn).await?;

        txn.commit().await?;
        Ok(stored)
    }

    /// Fetch the stored comparison for a pair, if one exists
    pub async fn find_for_pair(
        &self,
        base_schedule_id: Uuid,
        compare_schedule_id: Uuid,
    ) -> Result<Option<Model>, ApiError> {
        Ok(ScheduleComparison::find()
            .filter(Column::BaseScheduleId.eq(base_schedule_id))
            .filter(Column::CompareScheduleId.eq(compare_schedule_id))
            .one(self.db)
            .await?)
    }
}

struct AssignmentDiff {
    total_changes: i32,
    resource_changes: i32,
    timing_changes: i32,
    sequence_changes: i32,
    added: i32,
    removed: i32,
    highlights: Vec<String>,
}

/// Diff two assignment sets keyed by (assignment_type, assignment_id).
fn diff_assignments(base: &[AssignmentModel], compare: &[AssignmentModel]) -> AssignmentDiff {
    let key = |a: &AssignmentModel| (a.assignment_type.clone(), a.assignment_id.clone());
    let base_by_key: BTreeMap<_, _> = base.iter().map(|a| (key(a), a)).collect();
    let compare_by_key: BTreeMap<_, _> = compare.iter().map(|a| (key(a), a)).collect();

    let mut resource_changes = 0;
    let mut timing_changes = 0;
    let mut sequence_changes = 0;
    let mut changed_keys = 0;
    let mut highlights = Vec::new();

    for (k, base_row) in &base_by_key {
        let Some(compare_row) = compare_by_key.get(k) else {
            continue;
        };
        let mut changed = false;
        if base_row.resource_id != compare_row.resource_id {
            resource_changes += 1;
            changed = true;
            highlights.push(format!(
                "{} moved from {} to {}",
                base_row.assignment_id,
                base_row.resource_id.as_deref().unwrap_or("unassigned"),
                compare_row.resource_id.as_deref().unwrap_or("unassigned"),
            ));
        }
        if base_row.planned_start_time != compare_row.planned_start_time
            || base_row.planned_end_time != compare_row.planned_end_time
        {
            timing_changes += 1;
            changed = true;
        }
        if base_row.sequence_number != compare_row.sequence_number {
            sequence_changes += 1;
            changed = true;
        }
        if changed {
            changed_keys += 1;
        }
    }

    let added = compare_by_key
        .keys()
        .filter(|k| !base_by_key.contains_key(*k))
        .count() as i32;
    let removed = base_by_key
        .keys()
        .filter(|k| !compare_by_key.contains_key(*k))
        .count() as i32;

    if added > 0 {
        highlights.push(format!("{added} assignment(s) added"));
    }
    if removed > 0 {
        highlights.push(format!("{removed} assignment(s) removed"));
    }

    AssignmentDiff {
        total_changes: changed_keys + added + removed,
        resource_changes,
        timing_changes,
        sequence_changes,
        added,
        removed,
        highlights,
    }
}

fn delta(base: Option<f32>, compare: Option<f32>) -> Option<f32> {
    match (base, compare) {
        (Some(b), Some(c)) => Some(c - b),
        _ => None,
    }
}
