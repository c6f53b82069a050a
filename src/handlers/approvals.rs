//! # Approval Endpoint Handlers
//!
//! Approval slots and decisions for a schedule version.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::schedules::parse_schedule_id;
use crate::models::schedule_approval::Model as ApprovalModel;
use crate::repositories::ApprovalRepository;
use crate::server::AppState;

/// Approval slot information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalInfo {
    pub id: String,
    pub approval_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_sequence: Option<i32>,
    pub approver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub requested_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl From<ApprovalModel> for ApprovalInfo {
    fn from(model: ApprovalModel) -> Self {
        Self {
            id: model.id.to_string(),
            approval_level: model.approval_level,
            approval_sequence: model.approval_sequence,
            approver_id: model.approver_id,
            approver_name: model.approver_name,
            status: model.status,
            decision: model.decision,
            comments: model.comments,
            requested_at: model.requested_at.to_rfc3339(),
            reviewed_at: model.reviewed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Request body for creating an approval slot
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApprovalRequest {
    pub approver_id: String,
    pub approver_name: Option<String>,
    pub approver_role: Option<String>,
    pub approval_level: i32,
    pub approval_sequence: Option<i32>,
    /// RFC3339 due date for the decision
    pub due_date: Option<String>,
}

/// Create an approval slot for a schedule
#[utoipa::path(
    post,
    path = "/schedules/{id}/approvals",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = CreateApprovalRequest,
    responses(
        (status = 201, description = "Approval slot created", body = ApprovalInfo),
        (status = 409, description = "Slot already exists for this approver and level", body = ApiError)
    ),
    tag = "approvals"
)]
pub async fn create_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateApprovalRequest>,
) -> Result<(StatusCode, Json<ApprovalInfo>), ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let due_date = match body.due_date.as_deref() {
        Some(raw) => Some(DateTime::parse_from_rfc3339(raw).map_err(|_| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "dueDate must be an RFC3339 date-time",
            )
        })?),
        None => None,
    };

    let slot = ApprovalRepository::new(&state.db)
        .create_slot(
            schedule_id,
            &body.approver_id,
            body.approver_name,
            body.approver_role,
            body.approval_level,
            body.approval_sequence,
            due_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApprovalInfo::from(slot))))
}

/// Request body for recording an approval decision
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub approver_id: String,
    pub approval_level: i32,
    /// approve, reject, request_changes, or escalate
    #[schema(example = "approve")]
    pub decision: String,
    pub comments: Option<String>,
}

/// Record an approver's decision
#[utoipa::path(
    post,
    path = "/schedules/{id}/approvals/decision",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ApprovalInfo),
        (status = 404, description = "Approval slot not found", body = ApiError)
    ),
    tag = "approvals"
)]
pub async fn record_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<ApprovalInfo>, ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let slot = ApprovalRepository::new(&state.db)
        .record_decision(
            schedule_id,
            &body.approver_id,
            body.approval_level,
            &body.decision,
            body.comments,
        )
        .await?;

    Ok(Json(ApprovalInfo::from(slot)))
}

/// List the approval slots of a schedule
#[utoipa::path(
    get,
    path = "/schedules/{id}/approvals",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Approval slots listed", body = [ApprovalInfo])
    ),
    tag = "approvals"
)]
pub async fn list_approvals(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ApprovalInfo>>, ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let slots = ApprovalRepository::new(&state.db)
        .list_for_schedule(schedule_id)
        .await?;

    Ok(Json(slots.into_iter().map(ApprovalInfo::from).collect()))
}
