//! # Schedule Repository
//!
//! This module contains the repository implementation for Schedule entities:
//! atomic version creation (the schedule row and all its assignments appear
//! together or not at all), guarded workflow transitions, publish-and-
//! supersede, and baseline exclusivity within a lineage.

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule::{
    ActiveModel, ApprovalStatus, Column, Entity as Schedule, Model, ScheduleStatus, ScheduleType,
};
use crate::models::schedule_assignment::{
    ActiveModel as AssignmentActiveModel, Column as AssignmentColumn,
    Entity as ScheduleAssignment, Model as AssignmentModel,
};

/// Input for one assignment row of a new schedule version.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub assignment_type: String,
    pub assignment_id: String,
    pub assignment_name: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub planned_start_time: chrono::DateTime<chrono::FixedOffset>,
    pub planned_end_time: chrono::DateTime<chrono::FixedOffset>,
    pub planned_duration: Option<i32>,
    pub sequence_number: Option<i32>,
    pub priority: i32,
    pub is_locked: bool,
    pub is_manually_scheduled: bool,
    pub predecessors: Vec<String>,
    pub successors: Vec<String>,
}

/// Input for a new schedule version and its assignments.
#[derive(Debug, Clone)]
pub struct NewScheduleVersion {
    pub schedule_code: String,
    pub name: String,
    pub description: Option<String>,
    pub schedule_type: ScheduleType,
    pub scope_id: Option<String>,
    pub scope_name: Option<String>,
    /// Prior version in the lineage; the new row gets its version + 1
    pub parent_schedule_id: Option<Uuid>,
    pub start_date: chrono::DateTime<chrono::FixedOffset>,
    pub end_date: chrono::DateTime<chrono::FixedOffset>,
    pub created_by: String,
    pub parameters: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub utilization_rate: Option<f32>,
    pub efficiency_score: Option<f32>,
    pub on_time_delivery_rate: Option<f32>,
    pub assignments: Vec<NewAssignment>,
}

/// Repository for Schedule database operations
pub struct ScheduleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScheduleRepository<'a> {
    /// Create a new ScheduleRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new schedule version plus all of its assignments atomically.
    ///
    /// The new row starts in `draft`. When a parent is given, the version is
    /// parent.version + 1; published schedules are never mutated in place.
    pub async fn create_version(
        &self,
        input: NewScheduleVersion,
    ) -> Result<(Model, Vec<AssignmentModel>), ApiError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let version = match input.parent_schedule_id {
            Some(parent_id) => {
                let parent = Schedule::find_by_id(parent_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ApiError::new(
                            StatusCode::NOT_FOUND,
                            "NOT_FOUND",
                            "Parent schedule not found",
                        )
                    })?;
                parent.version + 1
            }
            None => 1,
        };

        let schedule_id = Uuid::new_v4();
        let horizon_days =
            i32::try_from((input.end_date - input.start_date).num_days()).ok();

        let schedule = ActiveModel {
            id: Set(schedule_id),
            schedule_code: Set(input.schedule_code),
            name: Set(input.name),
            description: Set(input.description),
            schedule_type: Set(input.schedule_type.as_str().to_string()),
            scope_id: Set(input.scope_id),
            scope_name: Set(input.scope_name),
            version: Set(version),
            parent_schedule_id: Set(input.parent_schedule_id),
            is_baseline: Set(false),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            schedule_horizon_days: Set(horizon_days),
            status: Set(ScheduleStatus::Draft.as_str().to_string()),
            approval_status: Set(ApprovalStatus::Pending.as_str().to_string()),
            created_by: Set(input.created_by),
            created_at: Set(now),
            modified_by: Set(None),
            modified_at: Set(now),
            approved_by: Set(None),
            approved_at: Set(None),
            published_at: Set(None),
            utilization_rate: Set(input.utilization_rate),
            efficiency_score: Set(input.efficiency_score),
            on_time_delivery_rate: Set(input.on_time_delivery_rate),
            parameters: Set(input.parameters),
            metadata: Set(input.metadata),
        };
        let schedule = schedule.insert(&txn).await?;

        let mut assignments = Vec::with_capacity(input.assignments.len());
        for item in input.assignments {
            let duration = item.planned_duration.or_else(|| {
                i32::try_from((item.planned_end_time - item.planned_start_time).num_minutes())
                    .ok()
            });
            let assignment = AssignmentActiveModel {
                id: Set(Uuid::new_v4()),
                schedule_id: Set(schedule_id),
                assignment_type: Set(item.assignment_type),
                assignment_id: Set(item.assignment_id),
                assignment_name: Set(item.assignment_name),
                resource_id: Set(item.resource_id),
                resource_name: Set(item.resource_name),
                alternate_resource_id: Set(None),
                planned_start_time: Set(item.planned_start_time),
                planned_end_time: Set(item.planned_end_time),
                actual_start_time: Set(None),
                actual_end_time: Set(None),
                planned_duration: Set(duration),
                actual_duration: Set(None),
                planned_quantity: Set(None),
                actual_quantity: Set(None),
                sequence_number: Set(item.sequence_number),
                priority: Set(item.priority),
                is_locked: Set(item.is_locked),
                is_manually_scheduled: Set(item.is_manually_scheduled),
                status: Set("scheduled".to_string()),
                completion_percentage: Set(0.0),
                predecessors: Set(Some(JsonValue::from(item.predecessors))),
                successors: Set(Some(JsonValue::from(item.successors))),
                constraints: Set(None),
                metadata: Set(None),
                notes: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            assignments.push(assignment.insert(&txn).await?);
        }

        txn.commit().await?;

        tracing::info!(
            schedule_id = %schedule.id,
            schedule_code = %schedule.schedule_code,
            version = schedule.version,
            assignment_count = assignments.len(),
            "Schedule version created"
        );

        Ok((schedule, assignments))
    }

    /// Find a schedule by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ApiError> {
        Ok(Schedule::find_by_id(id).one(self.db).await?)
    }

    /// Load a schedule or fail with 404
    pub async fn get(&self, id: Uuid) -> Result<Model, ApiError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Schedule not found")
        })
    }

    /// List schedules filtered by status, type, and scope
    pub async fn list(
        &self,
        status: Option<ScheduleStatus>,
        schedule_type: Option<ScheduleType>,
        scope_id: Option<String>,
        limit: u64,
    ) -> Result<Vec<Model>, ApiError> {
        let mut query = Schedule::find();

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(schedule_type) = schedule_type {
            query = query.filter(Column::ScheduleType.eq(schedule_type.as_str()));
        }
        if let Some(scope) = scope_id {
            query = query.filter(Column::ScopeId.eq(scope));
        }

        Ok(query
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?)
    }

    /// List the assignments of a schedule ordered by sequence
    pub async fn list_assignments(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<AssignmentModel>, ApiError> {
        Ok(ScheduleAssignment::find()
            .filter(AssignmentColumn::ScheduleId.eq(schedule_id))
            .order_by_asc(AssignmentColumn::SequenceNumber)
            .all(self.db)
            .await?)
    }

    /// Move a schedule to the next workflow status, enforcing the guard.
    pub async fn transition_status(
        &self,
        id: Uuid,
        next: ScheduleStatus,
        actor: &str,
    ) -> Result<Model, ApiError> {
        let schedule = self.get(id).await?;
        let current = parse_status(&schedule.status)?;

        if !current.can_transition_to(next) {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "CONFLICT".to_string(),
                format!("Cannot transition schedule from {current} to {next}"),
            ));
        }

        let now = Utc::now().fixed_offset();
        let mut active: ActiveModel = schedule.into();
        active.status = Set(next.as_str().to_string());
        active.modified_by = Set(Some(actor.to_string()));
        active.modified_at = Set(now);
        if next == ScheduleStatus::Approved {
            active.approved_by = Set(Some(actor.to_string()));
            active.approved_at = Set(Some(now));
        }

        Ok(active.update(self.db).await?)
    }

    /// Publish a schedule, superseding every other non-archived version of
    /// the same scope in the same transaction.
    pub async fn publish(&self, id: Uuid, actor: &str) -> Result<Model, ApiError> {
        let txn = self.db.begin().await?;

        let schedule = Schedule::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Schedule not found")
            })?;
        let current = parse_status(&schedule.status)?;

        if !current.can_transition_to(ScheduleStatus::Published) {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "CONFLICT".to_string(),
                format!("Cannot publish schedule in status {current}"),
            ));
        }

        let now = Utc::now().fixed_offset();

        // A newer published version replaces every live sibling of the scope.
        let mut supersede = Schedule::update_many()
            .col_expr(
                Column::Status,
                Expr::value(ScheduleStatus::Superseded.as_str()),
            )
            .col_expr(Column::ModifiedAt, Expr::value(now))
            .filter(Column::Id.ne(schedule.id))
            .filter(Column::ScheduleType.eq(schedule.schedule_type.clone()))
            .filter(Column::Status.ne(ScheduleStatus::Archived.as_str()))
            .filter(Column::Status.ne(ScheduleStatus::Superseded.as_str()));
        supersede = match &schedule.scope_id {
            Some(scope) => supersede.filter(Column::ScopeId.eq(scope.clone())),
            None => supersede.filter(Column::ScopeId.is_null()),
        };
        let superseded = supersede.exec(&txn).await?;

        let mut active: ActiveModel = schedule.into();
        active.status = Set(ScheduleStatus::Published.as_str().to_string());
        active.published_at = Set(Some(now));
        active.modified_by = Set(Some(actor.to_string()));
        active.modified_at = Set(now);
        let published = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            schedule_id = %published.id,
            superseded = superseded.rows_affected,
            "Schedule published"
        );

        Ok(published)
    }

    /// Mark a schedule as the baseline of its scope lineage, clearing the
    /// flag everywhere else in the same transaction so at most one baseline
    /// exists per (schedule_type, scope_id).
    pub async fn set_baseline(&self, id: Uuid) -> Result<Model, ApiError> {
        let txn = self.db.begin().await?;

        let schedule = Schedule::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Schedule not found")
            })?;

        let mut clear = Schedule::update_many()
            .col_expr(Column::IsBaseline, Expr::value(false))
            .filter(Column::ScheduleType.eq(schedule.schedule_type.clone()))
            .filter(Column::IsBaseline.eq(true));
        clear = match &schedule.scope_id {
            Some(scope) => clear.filter(Column::ScopeId.eq(scope.clone())),
            None => clear.filter(Column::ScopeId.is_null()),
        };
        clear.exec(&txn).await?;

        let mut active: ActiveModel = schedule.into();
        active.is_baseline = Set(true);
        active.modified_at = Set(Utc::now().fixed_offset());
        let baseline = active.update(&txn).await?;

        txn.commit().await?;
        Ok(baseline)
    }

    /// Delete a schedule; dependent rows cascade at the database level.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = Schedule::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Schedule not found",
            ));
        }
        Ok(())
    }
}

fn parse_status(value: &str) -> Result<ScheduleStatus, ApiError> {
    ScheduleStatus::parse(value).ok_or_else(|| {
        tracing::error!(status = value, "Schedule row carries an unknown status");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "Schedule status is corrupted",
        )
    })
}
