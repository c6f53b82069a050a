//! Optimization engine trait definition
//!
//! Defines the seam between the request gate and whatever solver the
//! deployment wires in. The engine receives a validated, sanitized request
//! and returns planned placements; its internal algorithm is its own
//! business.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::validation::{OptimizationRunRequest, TimeUnit};

/// Engine-specific error types for structured error handling
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine rejected the request (e.g. an unknown algorithm id)
    #[error("engine rejected the request: {details}")]
    Rejected { details: String },
    /// The engine exhausted its time budget without a feasible plan
    #[error("engine hit its time limit of {time_limit_seconds}s")]
    TimedOut { time_limit_seconds: u64 },
    /// Internal engine failure
    #[error("engine failure: {details}")]
    Internal { details: String },
}

/// One placement proposed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPlacement {
    /// Event id from the submitted snapshot
    pub event_id: String,
    pub event_name: String,
    /// Resource the event was placed on
    pub resource_id: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// Duration in minutes
    pub duration_minutes: i32,
    pub sequence_number: i32,
    pub priority: i32,
    pub is_locked: bool,
    pub is_manually_scheduled: bool,
    /// Event ids this placement depends on
    pub predecessors: Vec<String>,
}

/// Aggregate metrics the engine reports for a produced plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    pub utilization_rate: Option<f32>,
    pub efficiency_score: Option<f32>,
    pub on_time_delivery_rate: Option<f32>,
    /// Wall-clock the engine spent, in milliseconds
    pub elapsed_ms: u64,
}

/// Result of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineOutcome {
    pub placements: Vec<PlannedPlacement>,
    pub metrics: RunMetrics,
}

/// The solver collaborator behind the gate.
#[async_trait]
pub trait OptimizationEngine: Send + Sync {
    /// Run the engine over a validated, sanitized request.
    async fn run(&self, request: &OptimizationRunRequest) -> Result<EngineOutcome, EngineError>;
}

/// Passthrough engine used for wiring and tests.
///
/// Echoes the submitted placements: every event keeps its given resource and
/// dates. Events without dates are laid out back to back from now on.
pub struct PassthroughEngine;

#[async_trait]
impl OptimizationEngine for PassthroughEngine {
    async fn run(&self, request: &OptimizationRunRequest) -> Result<EngineOutcome, EngineError> {
        let started = std::time::Instant::now();
        let now: DateTime<FixedOffset> = Utc::now().fixed_offset();
        let mut cursor = now;

        let locked_events = &request.locks.events;
        let dependencies_by_target: Vec<(&str, &str)> = request
            .schedule_data
            .dependencies
            .iter()
            .map(|d| (d.to_event.as_str(), d.from_event.as_str()))
            .collect();

        let mut placements = Vec::with_capacity(request.schedule_data.events.len());
        for (index, event) in request.schedule_data.events.iter().enumerate() {
            let duration_minutes = duration_in_minutes(event.duration, event.duration_unit);

            let (start_time, end_time) = match (event.start_date, event.end_date) {
                (Some(start), Some(end)) => (start, end),
                (Some(start), None) => {
                    (start, start + chrono::Duration::minutes(duration_minutes.into()))
                }
                _ => {
                    let start = cursor;
                    let end = start + chrono::Duration::minutes(duration_minutes.into());
                    cursor = end;
                    (start, end)
                }
            };

            let predecessors = dependencies_by_target
                .iter()
                .filter(|(to, _)| *to == event.id)
                .map(|(_, from)| (*from).to_string())
                .collect();

            placements.push(PlannedPlacement {
                event_id: event.id.clone(),
                event_name: event.name.clone(),
                resource_id: event.resource_id.clone(),
                start_time,
                end_time,
                duration_minutes,
                sequence_number: index as i32 + 1,
                priority: i32::from(event.priority),
                is_locked: event.locked || locked_events.contains(&event.id),
                is_manually_scheduled: event.manually_scheduled,
                predecessors,
            });
        }

        Ok(EngineOutcome {
            placements,
            metrics: RunMetrics {
                elapsed_ms: started.elapsed().as_millis() as u64,
                ..RunMetrics::default()
            },
        })
    }
}

fn duration_in_minutes(duration: f64, unit: Option<TimeUnit>) -> i32 {
    let minutes = match unit {
        Some(TimeUnit::Minute) | None => duration,
        Some(TimeUnit::Hour) => duration * 60.0,
        Some(TimeUnit::Day) => duration * 60.0 * 24.0,
        Some(TimeUnit::Week) => duration * 60.0 * 24.0 * 7.0,
    };
    minutes.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_with_dated_event() -> OptimizationRunRequest {
        let body = json!({
            "algorithmId": "forward-scheduling",
            "scheduleData": {
                "resources": [{ "id": "R1", "name": "Machine 1" }],
                "events": [
                    {
                        "id": "E1",
                        "name": "Operation 1",
                        "resourceId": "R1",
                        "startDate": "2024-01-01T10:00:00Z",
                        "endDate": "2024-01-01T12:00:00Z",
                        "duration": 2,
                        "durationUnit": "hour"
                    },
                    { "id": "E2", "name": "Operation 2", "resourceId": "R1", "duration": 30 }
                ],
                "dependencies": [{ "fromEvent": "E1", "toEvent": "E2" }]
            },
            "locks": { "events": ["E1"] }
        });
        crate::validation::validate_optimization_request(&body).expect("fixture is valid")
    }

    #[tokio::test]
    async fn passthrough_engine_echoes_given_placements() {
        let request = request_with_dated_event();
        let outcome = PassthroughEngine.run(&request).await.expect("engine runs");

        assert_eq!(outcome.placements.len(), 2);
        let first = &outcome.placements[0];
        assert_eq!(first.event_id, "E1");
        assert_eq!(first.duration_minutes, 120);
        assert!(first.is_locked, "lock set pins E1");

        let second = &outcome.placements[1];
        assert_eq!(second.duration_minutes, 30);
        assert_eq!(second.predecessors, vec!["E1".to_string()]);
        assert_eq!(second.sequence_number, 2);
    }
}
