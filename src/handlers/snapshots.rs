//! # Snapshot and Comparison Endpoint Handlers
//!
//! Manual snapshot capture and version-to-version comparisons.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::schedules::parse_schedule_id;
use crate::models::schedule_comparison::Model as ComparisonModel;
use crate::models::schedule_snapshot::{Model as SnapshotModel, SnapshotType};
use crate::repositories::{ComparisonRepository, SnapshotRepository};
use crate::server::AppState;

/// Snapshot header information for API responses (the serialized state stays
/// server-side unless explicitly fetched)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_code: Option<String>,
    #[schema(example = "manual")]
    pub snapshot_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    pub is_baseline: bool,
    pub created_by: String,
    pub created_at: String,
}

impl From<SnapshotModel> for SnapshotInfo {
    fn from(model: SnapshotModel) -> Self {
        Self {
            id: model.id.to_string(),
            snapshot_code: model.snapshot_code,
            snapshot_type: model.snapshot_type,
            description: model.description,
            version: model.version,
            is_baseline: model.is_baseline,
            created_by: model.created_by,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Request body for capturing a snapshot
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshotRequest {
    /// auto, manual, approval, or publish
    #[schema(example = "manual")]
    pub snapshot_type: Option<String>,
    pub created_by: String,
    pub description: Option<String>,
}

/// Capture a snapshot of a schedule's current state
#[utoipa::path(
    post,
    path = "/schedules/{id}/snapshots",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = CaptureSnapshotRequest,
    responses(
        (status = 201, description = "Snapshot captured", body = SnapshotInfo),
        (status = 404, description = "Schedule not found", body = ApiError)
    ),
    tag = "snapshots"
)]
pub async fn capture_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CaptureSnapshotRequest>,
) -> Result<(StatusCode, Json<SnapshotInfo>), ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let snapshot_type = match body.snapshot_type.as_deref() {
        Some(raw) => SnapshotType::parse(raw).ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED".to_string(),
                format!("unknown snapshot type '{raw}'"),
            )
        })?,
        None => SnapshotType::Manual,
    };

    let snapshot = SnapshotRepository::new(&state.db)
        .capture(schedule_id, snapshot_type, &body.created_by, body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(SnapshotInfo::from(snapshot))))
}

/// List the snapshots of a schedule, newest first
#[utoipa::path(
    get,
    path = "/schedules/{id}/snapshots",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Snapshots listed", body = [SnapshotInfo])
    ),
    tag = "snapshots"
)]
pub async fn list_snapshots(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SnapshotInfo>>, ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let snapshots = SnapshotRepository::new(&state.db)
        .list_for_schedule(schedule_id)
        .await?;

    Ok(Json(snapshots.into_iter().map(SnapshotInfo::from).collect()))
}

/// Comparison information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_code: Option<String>,
    pub name: String,
    pub base_schedule_id: String,
    pub compare_schedule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_changes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_changes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_changes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_changes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_delta: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_delta: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time_delta: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<serde_json::Value>,
    pub created_at: String,
}

impl From<ComparisonModel> for ComparisonInfo {
    fn from(model: ComparisonModel) -> Self {
        Self {
            id: model.id.to_string(),
            comparison_code: model.comparison_code,
            name: model.name,
            base_schedule_id: model.base_schedule_id.to_string(),
            compare_schedule_id: model.compare_schedule_id.to_string(),
            total_changes: model.total_changes,
            resource_changes: model.resource_changes,
            timing_changes: model.timing_changes,
            sequence_changes: model.sequence_changes,
            utilization_delta: model.utilization_delta,
            efficiency_delta: model.efficiency_delta,
            on_time_delta: model.on_time_delta,
            highlights: model.highlights,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Request body for computing a comparison
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputeComparisonRequest {
    pub base_schedule_id: String,
    pub compare_schedule_id: String,
    pub name: String,
    pub created_by: String,
}

/// Compute and store the diff between two schedule versions
#[utoipa::path(
    post,
    path = "/comparisons",
    request_body = ComputeComparisonRequest,
    responses(
        (status = 201, description = "Comparison computed", body = ComparisonInfo),
        (status = 404, description = "One of the schedules was not found", body = ApiError)
    ),
    tag = "comparisons"
)]
pub async fn compute_comparison(
    State(state): State<AppState>,
    Json(body): Json<ComputeComparisonRequest>,
) -> Result<(StatusCode, Json<ComparisonInfo>), ApiError> {
    let base_id = parse_schedule_id(&body.base_schedule_id)?;
    let compare_id = parse_schedule_id(&body.compare_schedule_id)?;

    let comparison = ComparisonRepository::new(&state.db)
        .compute(base_id, compare_id, body.name, &body.created_by)
        .await?;

    Ok((StatusCode::CREATED, Json(ComparisonInfo::from(comparison))))
}
