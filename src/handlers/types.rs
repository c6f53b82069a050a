//! # Common API Types
//!
//! This module contains shared response types used across multiple API
//! handlers, converting entity models into wire representations with RFC3339
//! timestamps.

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::schedule::Model as ScheduleModel;
use crate::models::schedule_assignment::Model as AssignmentModel;

fn rfc3339(value: &DateTimeWithTimeZone) -> String {
    value.to_rfc3339()
}

fn rfc3339_opt(value: &Option<DateTimeWithTimeZone>) -> Option<String> {
    value.as_ref().map(rfc3339)
}

/// Schedule version information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInfo {
    /// Unique identifier for the schedule version
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    #[schema(example = "SCH-A1B2C3D4")]
    pub schedule_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(example = "plant")]
    pub schedule_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_name: Option<String>,
    pub version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_schedule_id: Option<String>,
    pub is_baseline: bool,
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub start_date: String,
    #[schema(example = "2024-01-31T00:00:00Z")]
    pub end_date: String,
    #[schema(example = "draft")]
    pub status: String,
    #[schema(example = "pending")]
    pub approval_status: String,
    pub created_by: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time_delivery_rate: Option<f32>,
}

impl From<ScheduleModel> for ScheduleInfo {
    fn from(model: ScheduleModel) -> Self {
        Self {
            id: model.id.to_string(),
            schedule_code: model.schedule_code,
            name: model.name,
            description: model.description,
            schedule_type: model.schedule_type,
            scope_id: model.scope_id,
            scope_name: model.scope_name,
            version: model.version,
            parent_schedule_id: model.parent_schedule_id.map(|id| id.to_string()),
            is_baseline: model.is_baseline,
            start_date: rfc3339(&model.start_date),
            end_date: rfc3339(&model.end_date),
            status: model.status,
            approval_status: model.approval_status,
            created_by: model.created_by,
            created_at: rfc3339(&model.created_at),
            published_at: rfc3339_opt(&model.published_at),
            utilization_rate: model.utilization_rate,
            efficiency_score: model.efficiency_score,
            on_time_delivery_rate: model.on_time_delivery_rate,
        }
    }
}

/// Assignment information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInfo {
    pub id: String,
    pub assignment_type: String,
    pub assignment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub planned_start_time: String,
    pub planned_end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i32>,
    pub priority: i32,
    pub is_locked: bool,
    pub is_manually_scheduled: bool,
    pub status: String,
    pub completion_percentage: f32,
}

impl From<AssignmentModel> for AssignmentInfo {
    fn from(model: AssignmentModel) -> Self {
        Self {
            id: model.id.to_string(),
            assignment_type: model.assignment_type,
            assignment_id: model.assignment_id,
            assignment_name: model.assignment_name,
            resource_id: model.resource_id,
            planned_start_time: rfc3339(&model.planned_start_time),
            planned_end_time: rfc3339(&model.planned_end_time),
            planned_duration: model.planned_duration,
            sequence_number: model.sequence_number,
            priority: model.priority,
            is_locked: model.is_locked,
            is_manually_scheduled: model.is_manually_scheduled,
            status: model.status,
            completion_percentage: model.completion_percentage,
        }
    }
}
