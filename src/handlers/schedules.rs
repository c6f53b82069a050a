//! # Schedule Endpoint Handlers
//!
//! This module contains the handlers for listing and fetching schedule
//! versions and driving their workflow: status transitions, publish with
//! supersede, and baseline selection.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::types::{AssignmentInfo, ScheduleInfo};
use crate::models::schedule::{ScheduleStatus, ScheduleType};
use crate::models::schedule_snapshot::SnapshotType;
use crate::repositories::{ScheduleRepository, SnapshotRepository};
use crate::server::AppState;

/// Query parameters for listing schedules
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListSchedulesQuery {
    /// Filter by workflow status
    pub status: Option<String>,
    /// Filter by schedule type
    #[serde(rename = "type")]
    pub schedule_type: Option<String>,
    /// Filter by scope identifier
    pub scope_id: Option<String>,
    /// Maximum number of schedules to return (default: 50, max: 200)
    pub limit: Option<u64>,
}

/// Response payload for the schedules listing
#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulesResponse {
    pub schedules: Vec<ScheduleInfo>,
}

/// Response payload for a single schedule with its assignments
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDetailResponse {
    #[serde(flatten)]
    pub schedule: ScheduleInfo,
    pub assignments: Vec<AssignmentInfo>,
}

/// List schedules with filters
#[utoipa::path(
    get,
    path = "/schedules",
    params(ListSchedulesQuery),
    responses(
        (status = 200, description = "Schedules listed successfully", body = SchedulesResponse),
        (status = 400, description = "Invalid query parameters", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<Json<SchedulesResponse>, ApiError> {
    let limit = query.limit.unwrap_or(50);
    if limit == 0 || limit > 200 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "limit must be between 1 and 200",
        ));
    }

    let status = match query.status.as_deref() {
        Some(value) => Some(ScheduleStatus::parse(value).ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED".to_string(),
                format!("unknown status '{value}'"),
            )
        })?),
        None => None,
    };
    let schedule_type = match query.schedule_type.as_deref() {
        Some(value) => Some(ScheduleType::parse(value).ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED".to_string(),
                format!("unknown schedule type '{value}'"),
            )
        })?),
        None => None,
    };

    let schedules = ScheduleRepository::new(&state.db)
        .list(status, schedule_type, query.scope_id, limit)
        .await?;

    Ok(Json(SchedulesResponse {
        schedules: schedules.into_iter().map(ScheduleInfo::from).collect(),
    }))
}

/// Fetch one schedule version with its assignments
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Schedule found", body = ScheduleDetailResponse),
        (status = 404, description = "Schedule not found", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleDetailResponse>, ApiError> {
    let id = parse_schedule_id(&id)?;
    let repository = ScheduleRepository::new(&state.db);

    let schedule = repository.get(id).await?;
    let assignments = repository.list_assignments(id).await?;

    Ok(Json(ScheduleDetailResponse {
        schedule: ScheduleInfo::from(schedule),
        assignments: assignments.into_iter().map(AssignmentInfo::from).collect(),
    }))
}

/// Request body for a workflow transition
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Target workflow status
    #[schema(example = "in_review")]
    pub status: String,
    /// User performing the transition
    pub actor: String,
}

/// Move a schedule to the next workflow status
#[utoipa::path(
    post,
    path = "/schedules/{id}/transition",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = ScheduleInfo),
        (status = 404, description = "Schedule not found", body = ApiError),
        (status = 409, description = "Transition not allowed by the workflow", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn transition_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<ScheduleInfo>, ApiError> {
    let id = parse_schedule_id(&id)?;
    let next = ScheduleStatus::parse(&body.status).ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED".to_string(),
            format!("unknown status '{}'", body.status),
        )
    })?;

    let schedule = ScheduleRepository::new(&state.db)
        .transition_status(id, next, &body.actor)
        .await?;

    Ok(Json(ScheduleInfo::from(schedule)))
}

/// Request body for publishing a schedule
#[derive(Debug, Deserialize, ToSchema)]
pub struct PublishRequest {
    /// User performing the publish
    pub actor: String,
}

/// Publish a schedule, superseding every live sibling of its scope
#[utoipa::path(
    post,
    path = "/schedules/{id}/publish",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Schedule published", body = ScheduleInfo),
        (status = 404, description = "Schedule not found", body = ApiError),
        (status = 409, description = "Schedule is not in a publishable status", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn publish_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<ScheduleInfo>, ApiError> {
    let id = parse_schedule_id(&id)?;

    let published = ScheduleRepository::new(&state.db)
        .publish(id, &body.actor)
        .await?;

    // Publication is an audit point; keep a snapshot of what went live.
    SnapshotRepository::new(&state.db)
        .capture(id, SnapshotType::Publish, &body.actor, None)
        .await?;

    Ok(Json(ScheduleInfo::from(published)))
}

/// Mark a schedule as the baseline of its scope lineage
#[utoipa::path(
    post,
    path = "/schedules/{id}/baseline",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Baseline set", body = ScheduleInfo),
        (status = 404, description = "Schedule not found", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn set_baseline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleInfo>, ApiError> {
    let id = parse_schedule_id(&id)?;
    let baseline = ScheduleRepository::new(&state.db).set_baseline(id).await?;
    Ok(Json(ScheduleInfo::from(baseline)))
}

/// Delete a schedule version and everything that hangs off it
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found", body = ApiError)
    ),
    tag = "schedules"
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_schedule_id(&id)?;
    ScheduleRepository::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn parse_schedule_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::from_str(raw).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "schedule id must be a valid UUID",
        )
    })
}
