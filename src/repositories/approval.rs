//! # Approval Repository
//!
//! Approval-workflow steps for a schedule version. Slot creation relies on
//! the unique constraint over (schedule_id, approver_id, approval_level):
//! concurrent duplicate attempts fail one writer with a 409 instead of both
//! succeeding.

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule::{ActiveModel as ScheduleActiveModel, ApprovalStatus, Entity as Schedule};
use crate::models::schedule_approval::{ActiveModel, Column, Entity as ScheduleApproval, Model};

/// Repository for approval-workflow database operations
pub struct ApprovalRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ApprovalRepository<'a> {
    /// Create a new ApprovalRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an approval slot for a schedule. Fails with 409 when the slot
    /// already exists for (schedule, approver, level).
    pub async fn create_slot(
        &self,
        schedule_id: Uuid,
        approver_id: &str,
        approver_name: Option<String>,
        approver_role: Option<String>,
        approval_level: i32,
        approval_sequence: Option<i32>,
        due_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    ) -> Result<Model, ApiError> {
        let now = Utc::now().fixed_offset();

        let slot = ActiveModel {
            id: Set(Uuid::new_v4()),
            schedule_id: Set(schedule_id),
            approval_level: Set(approval_level),
            approval_sequence: Set(approval_sequence),
            approver_id: Set(approver_id.to_string()),
            approver_name: Set(approver_name),
            approver_role: Set(approver_role),
            delegated_to: Set(None),
            status: Set(ApprovalStatus::Pending.as_str().to_string()),
            decision: Set(None),
            comments: Set(None),
            conditions: Set(None),
            requested_at: Set(now),
            reviewed_at: Set(None),
            due_date: Set(due_date),
            escalated_at: Set(None),
            attachments: Set(None),
            metadata: Set(None),
        };

        let created = slot.insert(self.db).await?;

        tracing::info!(
            schedule_id = %schedule_id,
            approver_id = %created.approver_id,
            approval_level = created.approval_level,
            "Approval slot created"
        );

        Ok(created)
    }

    /// Record an approver's decision on their slot and roll the aggregate
    /// approval status up to the schedule row in the same transaction.
    pub async fn record_decision(
        &self,
        schedule_id: Uuid,
        approver_id: &str,
        approval_level: i32,
        decision: &str,
        comments: Option<String>,
    ) -> Result<Model, ApiError> {
        let status = match decision {
            "approve" => ApprovalStatus::Approved,
            "reject" => ApprovalStatus::Rejected,
            "request_changes" => ApprovalStatus::OnHold,
            "escalate" => ApprovalStatus::Escalated,
            other => {
                return Err(ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_FAILED".to_string(),
                    format!("Unknown approval decision '{other}'"),
                ));
            }
        };

        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let slot = ScheduleApproval::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .filter(Column::ApproverId.eq(approver_id))
            .filter(Column::ApprovalLevel.eq(approval_level))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Approval slot not found",
                )
            })?;

        let mut active: ActiveModel = slot.into();
        active.status = Set(status.as_str().to_string());
        active.decision = Set(Some(decision.to_string()));
        active.comments = Set(comments);
        active.reviewed_at = Set(Some(now));
        if status == ApprovalStatus::Escalated {
            active.escalated_at = Set(Some(now));
        }
        let updated = active.update(&txn).await?;

        // Roll the per-approver statuses up to the schedule: any rejection
        // wins, then escalation, then hold; all-approved means approved.
        let slots = ScheduleApproval::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .order_by_asc(Column::ApprovalLevel)
            .all(&txn)
            .await?;

        let statuses: Vec<ApprovalStatus> = slots
            .iter()
            .filter_map(|s| ApprovalStatus::parse(&s.status))
            .collect();
        let rollup = if statuses.iter().any(|s| *s == ApprovalStatus::Rejected) {
            ApprovalStatus::Rejected
        } else if statuses.iter().any(|s| *s == ApprovalStatus::Escalated) {
            ApprovalStatus::Escalated
        } else if statuses.iter().any(|s| *s == ApprovalStatus::OnHold) {
            ApprovalStatus::OnHold
        } else if !statuses.is_empty()
            && statuses.iter().all(|s| *s == ApprovalStatus::Approved)
        {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        };

        let schedule = Schedule::find_by_id(schedule_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Schedule not found")
            })?;
        let mut schedule_active: ScheduleActiveModel = schedule.into();
        schedule_active.approval_status = Set(rollup.as_str().to_string());
        schedule_active.modified_at = Set(now);
        schedule_active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            schedule_id = %schedule_id,
            approver_id = %approver_id,
            decision = decision,
            rollup = rollup.as_str(),
            "Approval decision recorded"
        );

        Ok(updated)
    }

    /// List the approval slots of a schedule ordered by level and sequence
    pub async fn list_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Model>, ApiError> {
        Ok(ScheduleApproval::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .order_by_asc(Column::ApprovalLevel)
            .order_by_asc(Column::ApprovalSequence)
            .all(self.db)
            .await?)
    }
}
