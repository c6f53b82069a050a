//! Shared helpers for integration tests.
//!
//! Tests run against an in-memory SQLite database through the same
//! migrations the service applies to Postgres. The pool is capped at one
//! connection so every query sees the same in-memory database.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use scheduling::config::AppConfig;
use scheduling::engine::PassthroughEngine;
use scheduling::migration::{Migrator, MigratorTrait};
use scheduling::models::schedule::ScheduleType;
use scheduling::repositories::{NewAssignment, NewScheduleVersion};
use scheduling::server::AppState;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Connect to a fresh in-memory SQLite database and apply all migrations.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite connects");
    Migrator::up(&db, None).await.expect("migrations apply");
    db
}

/// Build an application state around a fresh test database.
pub async fn test_state() -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        db: test_db().await,
        engine: Arc::new(PassthroughEngine),
    }
}

pub fn ts(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).expect("fixture timestamp parses")
}

/// A draft plant schedule with two assignments on one machine.
pub fn sample_version(code: &str, parent: Option<Uuid>) -> NewScheduleVersion {
    NewScheduleVersion {
        schedule_code: code.to_string(),
        name: "Week 3 plan".to_string(),
        description: None,
        schedule_type: ScheduleType::Plant,
        scope_id: Some("plant-1".to_string()),
        scope_name: Some("Main plant".to_string()),
        parent_schedule_id: parent,
        start_date: ts("2024-01-01T06:00:00Z"),
        end_date: ts("2024-01-07T22:00:00Z"),
        created_by: "planner".to_string(),
        parameters: None,
        metadata: None,
        utilization_rate: Some(0.8),
        efficiency_score: Some(0.9),
        on_time_delivery_rate: Some(0.95),
        assignments: vec![
            NewAssignment {
                assignment_type: "operation".to_string(),
                assignment_id: "OP-100".to_string(),
                assignment_name: Some("Milling".to_string()),
                resource_id: Some("M1".to_string()),
                resource_name: Some("Mill 1".to_string()),
                planned_start_time: ts("2024-01-01T08:00:00Z"),
                planned_end_time: ts("2024-01-01T10:00:00Z"),
                planned_duration: Some(120),
                sequence_number: Some(1),
                priority: 5,
                is_locked: false,
                is_manually_scheduled: false,
                predecessors: Vec::new(),
                successors: vec!["OP-200".to_string()],
            },
            NewAssignment {
                assignment_type: "operation".to_string(),
                assignment_id: "OP-200".to_string(),
                assignment_name: Some("Drilling".to_string()),
                resource_id: Some("M1".to_string()),
                resource_name: Some("Mill 1".to_string()),
                planned_start_time: ts("2024-01-01T10:00:00Z"),
                planned_end_time: ts("2024-01-01T11:30:00Z"),
                planned_duration: Some(90),
                sequence_number: Some(2),
                priority: 5,
                is_locked: false,
                is_manually_scheduled: false,
                predecessors: vec!["OP-100".to_string()],
                successors: Vec::new(),
            },
        ],
    }
}
