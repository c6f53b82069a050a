//! # Tests for Handlers
//!
//! This module contains unit tests for API handlers.

use crate::handlers::{root, schedules::parse_schedule_id};
use axum::response::Json;

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "scheduling-api");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_parse_schedule_id_accepts_uuids() {
    let id = uuid::Uuid::new_v4();
    let parsed = parse_schedule_id(&id.to_string()).expect("valid UUID parses");
    assert_eq!(parsed, id);
}

#[test]
fn test_parse_schedule_id_rejects_garbage() {
    let error = parse_schedule_id("not-a-uuid").expect_err("garbage must fail");
    assert_eq!(&*error.code, "VALIDATION_FAILED");
}
