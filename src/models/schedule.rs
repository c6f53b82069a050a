//! Schedule entity model
//!
//! This module contains the SeaORM entity model for the schedules table,
//! which stores one row per schedule version, linked into lineages through
//! `parent_schedule_id`. It also carries the canonical status vocabularies
//! and the workflow transition guard.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Schedule entity representing one version of a plan for a scope
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    /// Unique identifier for the schedule version (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-facing schedule code, unique across all versions
    pub schedule_code: String,

    /// Display name for the schedule
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Planning scope granularity (see [`ScheduleType`])
    pub schedule_type: String,

    /// Identifier of the plant/department/resource the schedule covers
    pub scope_id: Option<String>,

    /// Display name of the scope
    pub scope_name: Option<String>,

    /// Version number, monotonically increasing within a lineage
    pub version: i32,

    /// Previous version in the lineage, if any
    pub parent_schedule_id: Option<Uuid>,

    /// Whether this version is the baseline for its lineage
    pub is_baseline: bool,

    /// Start of the planning horizon
    pub start_date: DateTimeWithTimeZone,

    /// End of the planning horizon
    pub end_date: DateTimeWithTimeZone,

    /// Horizon length in days, when derived
    pub schedule_horizon_days: Option<i32>,

    /// Workflow status (see [`ScheduleStatus`])
    pub status: String,

    /// Approval sub-workflow status (see [`ApprovalStatus`]), independent of `status`
    pub approval_status: String,

    /// User who created this version
    pub created_by: String,

    /// Timestamp when the version was created
    pub created_at: DateTimeWithTimeZone,

    /// User who last modified the version
    pub modified_by: Option<String>,

    /// Timestamp of the last modification
    pub modified_at: DateTimeWithTimeZone,

    /// User who approved the version
    pub approved_by: Option<String>,

    /// Timestamp of approval
    pub approved_at: Option<DateTimeWithTimeZone>,

    /// Timestamp of publication
    pub published_at: Option<DateTimeWithTimeZone>,

    /// Aggregate resource utilization of the plan (0..1)
    pub utilization_rate: Option<f32>,

    /// Aggregate efficiency score of the plan (0..1)
    pub efficiency_score: Option<f32>,

    /// On-time delivery rate of the plan (0..1)
    pub on_time_delivery_rate: Option<f32>,

    /// Scheduling parameters the optimization run used
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub parameters: Option<JsonValue>,

    /// Free-form metadata
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<JsonValue>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentScheduleId",
        to = "Column::Id"
    )]
    Parent,
}

impl ActiveModelBehavior for ActiveModel {}

/// Planning scope granularity for a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleType {
    Plant,
    Department,
    Resource,
    WorkCenter,
    ProductionLine,
    Enterprise,
}

impl ScheduleType {
    pub const ALL: &'static [ScheduleType] = &[
        ScheduleType::Plant,
        ScheduleType::Department,
        ScheduleType::Resource,
        ScheduleType::WorkCenter,
        ScheduleType::ProductionLine,
        ScheduleType::Enterprise,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScheduleType::Plant => "plant",
            ScheduleType::Department => "department",
            ScheduleType::Resource => "resource",
            ScheduleType::WorkCenter => "work_center",
            ScheduleType::ProductionLine => "production_line",
            ScheduleType::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<ScheduleType> {
        ScheduleType::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level workflow status of a schedule version.
///
/// The chain advances one step at a time: draft, in_review, approved,
/// published, active, archived. `superseded` is reachable from any
/// non-archived status when a newer version is published for the same scope.
/// `archived` and `superseded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleStatus {
    Draft,
    InReview,
    Approved,
    Published,
    Active,
    Archived,
    Superseded,
}

impl ScheduleStatus {
    pub const ALL: &'static [ScheduleStatus] = &[
        ScheduleStatus::Draft,
        ScheduleStatus::InReview,
        ScheduleStatus::Approved,
        ScheduleStatus::Published,
        ScheduleStatus::Active,
        ScheduleStatus::Archived,
        ScheduleStatus::Superseded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Draft => "draft",
            ScheduleStatus::InReview => "in_review",
            ScheduleStatus::Approved => "approved",
            ScheduleStatus::Published => "published",
            ScheduleStatus::Active => "active",
            ScheduleStatus::Archived => "archived",
            ScheduleStatus::Superseded => "superseded",
        }
    }

    pub fn parse(value: &str) -> Option<ScheduleStatus> {
        ScheduleStatus::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    /// The next status in the forward chain, if any.
    pub const fn next_in_chain(self) -> Option<ScheduleStatus> {
        match self {
            ScheduleStatus::Draft => Some(ScheduleStatus::InReview),
            ScheduleStatus::InReview => Some(ScheduleStatus::Approved),
            ScheduleStatus::Approved => Some(ScheduleStatus::Published),
            ScheduleStatus::Published => Some(ScheduleStatus::Active),
            ScheduleStatus::Active => Some(ScheduleStatus::Archived),
            ScheduleStatus::Archived | ScheduleStatus::Superseded => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ScheduleStatus::Archived | ScheduleStatus::Superseded)
    }

    /// Whether the workflow permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: ScheduleStatus) -> bool {
        if next == ScheduleStatus::Superseded {
            return self != ScheduleStatus::Archived && self != ScheduleStatus::Superseded;
        }
        self.next_in_chain() == Some(next)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval sub-workflow status, tracked independently of [`ScheduleStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    OnHold,
    Escalated,
}

impl ApprovalStatus {
    pub const ALL: &'static [ApprovalStatus] = &[
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
        ApprovalStatus::OnHold,
        ApprovalStatus::Escalated,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::OnHold => "on_hold",
            ApprovalStatus::Escalated => "escalated",
        }
    }

    pub fn parse(value: &str) -> Option<ApprovalStatus> {
        ApprovalStatus::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chain_advances_one_step_at_a_time() {
        assert!(ScheduleStatus::Draft.can_transition_to(ScheduleStatus::InReview));
        assert!(ScheduleStatus::InReview.can_transition_to(ScheduleStatus::Approved));
        assert!(ScheduleStatus::Approved.can_transition_to(ScheduleStatus::Published));
        assert!(ScheduleStatus::Published.can_transition_to(ScheduleStatus::Active));
        assert!(ScheduleStatus::Active.can_transition_to(ScheduleStatus::Archived));

        // No skipping and no going backwards
        assert!(!ScheduleStatus::Draft.can_transition_to(ScheduleStatus::Approved));
        assert!(!ScheduleStatus::Published.can_transition_to(ScheduleStatus::Draft));
        assert!(!ScheduleStatus::Approved.can_transition_to(ScheduleStatus::InReview));
    }

    #[test]
    fn superseded_reachable_from_any_non_archived_status() {
        for status in ScheduleStatus::ALL {
            let expected = !status.is_terminal();
            assert_eq!(
                status.can_transition_to(ScheduleStatus::Superseded),
                expected,
                "{status} -> superseded"
            );
        }
    }

    #[test]
    fn terminal_statuses_allow_no_transitions() {
        for target in ScheduleStatus::ALL {
            assert!(!ScheduleStatus::Archived.can_transition_to(*target));
            assert!(!ScheduleStatus::Superseded.can_transition_to(*target));
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in ScheduleStatus::ALL {
            assert_eq!(ScheduleStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(ScheduleStatus::parse("unknown"), None);
        for kind in ScheduleType::ALL {
            assert_eq!(ScheduleType::parse(kind.as_str()), Some(*kind));
        }
        for status in ApprovalStatus::ALL {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(*status));
        }
    }
}
