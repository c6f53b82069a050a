//! # Optimization Run Endpoint Handler
//!
//! This module contains the handler for POST /optimization/run: the request
//! body passes the validation gate, gets sanitized, is handed to the engine,
//! and the resulting plan is persisted as a new draft schedule version with
//! an automatic snapshot.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::engine::{EngineError, EngineOutcome};
use crate::error::ApiError;
use crate::models::schedule::ScheduleType;
use crate::models::schedule_snapshot::SnapshotType;
use crate::repositories::{
    NewAssignment, NewScheduleVersion, ScheduleRepository, SnapshotRepository,
};
use crate::server::AppState;
use crate::validation::{OptimizationRunRequest, validate_optimization_request};

/// Response payload for a completed optimization run
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRunResponse {
    /// Identifier of the schedule version the run produced
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub schedule_id: String,
    #[schema(example = "SCH-A1B2C3D4")]
    pub schedule_code: String,
    pub version: i32,
    pub assignment_count: usize,
    /// Algorithm that produced the plan
    #[schema(example = "forward-scheduling")]
    pub algorithm_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_score: Option<f32>,
    /// Engine wall-clock in milliseconds
    pub elapsed_ms: u64,
}

/// Run the optimization engine over a submitted schedule snapshot
#[utoipa::path(
    post,
    path = "/optimization/run",
    request_body = crate::validation::OptimizationRunRequest,
    responses(
        (status = 201, description = "Optimization completed and persisted", body = OptimizationRunResponse),
        (status = 400, description = "Request failed validation; details list every violation", body = ApiError, example = json!({
            "code": "VALIDATION_FAILED",
            "message": "Request failed validation with 2 violation(s)",
            "details": {
                "violations": [
                    { "path": "algorithmId", "message": "invalid algorithm ID format (letters, digits, hyphen, underscore; max 100 chars)" },
                    { "path": "scheduleData.events", "message": "too many items (limit 10000, got 10001)" }
                ]
            },
            "trace_id": "corr-12345678"
        })),
        (status = 422, description = "Engine rejected the validated request", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "optimization"
)]
pub async fn run_optimization(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<OptimizationRunResponse>), ApiError> {
    let mut request = validate_optimization_request(&body)?;

    // The gate default is a constant; deployments can tune the fallback.
    if parameters_omit_time_limit(&body) {
        request.parameters.time_limit = state.config.optimizer.default_time_limit_seconds;
    }

    let request = request.sanitized();

    tracing::info!(
        algorithm_id = %request.algorithm_id,
        event_count = request.schedule_data.events.len(),
        resource_count = request.schedule_data.resources.len(),
        "Optimization request accepted"
    );

    let outcome = state.engine.run(&request).await.map_err(map_engine_error)?;

    let (schedule, assignments) = persist_outcome(&state, &request, &outcome).await?;

    SnapshotRepository::new(&state.db)
        .capture(schedule.id, SnapshotType::Auto, &schedule.created_by, None)
        .await?;

    let response = OptimizationRunResponse {
        schedule_id: schedule.id.to_string(),
        schedule_code: schedule.schedule_code,
        version: schedule.version,
        assignment_count: assignments.len(),
        algorithm_id: request.algorithm_id,
        utilization_rate: outcome.metrics.utilization_rate,
        efficiency_score: outcome.metrics.efficiency_score,
        elapsed_ms: outcome.metrics.elapsed_ms,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

fn parameters_omit_time_limit(body: &Value) -> bool {
    let parameters = body.get("parameters").or_else(|| body.get("options"));
    match parameters {
        Some(Value::Object(map)) => !map.contains_key("timeLimit"),
        _ => true,
    }
}

fn map_engine_error(error: EngineError) -> ApiError {
    match error {
        EngineError::Rejected { details } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "ENGINE_REJECTED".to_string(),
            details,
        ),
        EngineError::TimedOut { time_limit_seconds } => ApiError::new(
            StatusCode::GATEWAY_TIMEOUT,
            "ENGINE_TIMEOUT".to_string(),
            format!("Engine exceeded its time limit of {time_limit_seconds}s"),
        ),
        EngineError::Internal { details } => {
            tracing::error!("Engine failure: {details}");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Optimization engine failure",
            )
        }
    }
}

async fn persist_outcome(
    state: &AppState,
    request: &OptimizationRunRequest,
    outcome: &EngineOutcome,
) -> Result<
    (
        crate::models::schedule::Model,
        Vec<crate::models::schedule_assignment::Model>,
    ),
    ApiError,
> {
    let metadata = &request.schedule_data.metadata;
    let now = Utc::now().fixed_offset();

    let start_date = outcome
        .placements
        .iter()
        .map(|p| p.start_time)
        .min()
        .unwrap_or(now);
    let end_date = outcome
        .placements
        .iter()
        .map(|p| p.end_time)
        .max()
        .unwrap_or(now);

    let assignments = outcome
        .placements
        .iter()
        .map(|placement| NewAssignment {
            assignment_type: "operation".to_string(),
            assignment_id: placement.event_id.clone(),
            assignment_name: Some(placement.event_name.clone()),
            resource_id: placement.resource_id.clone(),
            resource_name: None,
            planned_start_time: placement.start_time,
            planned_end_time: placement.end_time,
            planned_duration: Some(placement.duration_minutes),
            sequence_number: Some(placement.sequence_number),
            priority: placement.priority,
            is_locked: placement.is_locked,
            is_manually_scheduled: placement.is_manually_scheduled,
            predecessors: placement.predecessors.clone(),
            successors: Vec::new(),
        })
        .collect();

    let schedule_code = format!(
        "SCH-{}",
        &uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
    );
    let name = metadata
        .description
        .clone()
        .unwrap_or_else(|| format!("{} run", request.algorithm_id));
    let created_by = metadata
        .user_id
        .clone()
        .unwrap_or_else(|| "system".to_string());

    let input = NewScheduleVersion {
        schedule_code,
        name,
        description: metadata.description.clone(),
        schedule_type: ScheduleType::Plant,
        scope_id: metadata.plant_id.clone(),
        scope_name: None,
        parent_schedule_id: None,
        start_date,
        end_date,
        created_by,
        parameters: serde_json::to_value(&request.parameters).ok(),
        metadata: Some(json!({
            "algorithmId": request.algorithm_id,
            "profileId": request.profile_id,
            "sourceScheduleId": metadata.schedule_id,
        })),
        utilization_rate: outcome.metrics.utilization_rate,
        efficiency_score: outcome.metrics.efficiency_score,
        on_time_delivery_rate: outcome.metrics.on_time_delivery_rate,
        assignments,
    };

    ScheduleRepository::new(&state.db).create_version(input).await
}
