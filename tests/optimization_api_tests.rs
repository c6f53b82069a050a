//! End-to-end tests for the optimization endpoint: the request passes the
//! gate, is sanitized, runs through the engine, and lands in the store as a
//! draft schedule version.

mod test_utils;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use scheduling::repositories::ScheduleRepository;
use scheduling::server::create_app;
use serde_json::{Value, json};
use tower::util::ServiceExt;

async fn post_json(app: axum::Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("handler responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, value)
}

fn run_request() -> Value {
    json!({
        "algorithmId": "forward-scheduling",
        "profileId": "1",
        "scheduleData": {
            "resources": [
                { "id": "R1", "name": "Machine 1", "capacity": 1 }
            ],
            "events": [
                {
                    "id": "E1",
                    "name": "Operation 1",
                    "resourceId": "R1",
                    "startDate": "2024-01-01T10:00:00Z",
                    "endDate": "2024-01-01T12:00:00Z",
                    "duration": 2,
                    "durationUnit": "hour"
                }
            ],
            "dependencies": [],
            "constraints": {
                "maxMakespan": 720,
                "minResourceUtilization": 0.5
            },
            "metadata": {
                "scheduleId": "test-schedule",
                "plantId": "plant-1",
                "userId": "test-user",
                "description": "Test schedule for validation"
            }
        },
        "parameters": {
            "timeLimit": 60,
            "objectives": ["minimize_makespan", "maximize_utilization"]
        }
    })
}

#[tokio::test]
async fn valid_run_persists_a_draft_schedule_version() {
    let state = test_utils::test_state().await;
    let app = create_app(state.clone());

    let (status, body) = post_json(app, "/optimization/run", &run_request()).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["algorithmId"], "forward-scheduling");
    assert_eq!(body["assignmentCount"], 1);
    assert_eq!(body["version"], 1);

    let schedule_id = body["scheduleId"]
        .as_str()
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .expect("response carries the schedule id");

    let repository = ScheduleRepository::new(&state.db);
    let schedule = repository.get(schedule_id).await.expect("schedule persisted");
    assert_eq!(schedule.status, "draft");
    assert_eq!(schedule.scope_id.as_deref(), Some("plant-1"));
    assert_eq!(schedule.created_by, "test-user");

    let assignments = repository
        .list_assignments(schedule_id)
        .await
        .expect("assignments persisted");
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].assignment_id, "E1");
    assert_eq!(assignments[0].planned_duration, Some(120));
}

#[tokio::test]
async fn invalid_algorithm_id_yields_400_with_violation_paths() {
    let state = test_utils::test_state().await;
    let app = create_app(state);

    let mut body = run_request();
    body["algorithmId"] = json!("invalid algorithm!");

    let (status, response) = post_json(app, "/optimization/run", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_FAILED");

    let violations = response["details"]["violations"]
        .as_array()
        .expect("violations listed");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["path"], "algorithmId");
    assert!(
        violations[0]["message"]
            .as_str()
            .expect("message is a string")
            .contains("invalid algorithm ID format")
    );
}

#[tokio::test]
async fn all_violations_are_reported_in_one_response() {
    let state = test_utils::test_state().await;
    let app = create_app(state);

    let mut body = run_request();
    body["algorithmId"] = json!("bad id!");
    body["scheduleData"]["events"][0]["startDate"] = json!("2024-01-01");
    body["parameters"]["timeLimit"] = json!(301);

    let (status, response) = post_json(app, "/optimization/run", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let violations = response["details"]["violations"]
        .as_array()
        .expect("violations listed");
    assert_eq!(violations.len(), 3, "every broken rule is reported at once");
}

#[tokio::test]
async fn script_content_is_stripped_before_persistence() {
    let state = test_utils::test_state().await;
    let app = create_app(state.clone());

    let mut body = run_request();
    body["scheduleData"]["metadata"]["description"] =
        json!("<script>alert(1)</script>Week 3 rerun");
    body["scheduleData"]["events"][0]["name"] = json!("<b>Operation 1</b>");

    let (status, response) = post_json(app, "/optimization/run", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let schedule_id = response["scheduleId"]
        .as_str()
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .expect("schedule id returned");

    let repository = ScheduleRepository::new(&state.db);
    let schedule = repository.get(schedule_id).await.expect("schedule persisted");
    assert_eq!(schedule.description.as_deref(), Some("Week 3 rerun"));

    let assignments = repository
        .list_assignments(schedule_id)
        .await
        .expect("assignments persisted");
    assert_eq!(assignments[0].assignment_name.as_deref(), Some("Operation 1"));
}

#[tokio::test]
async fn minimal_request_applies_documented_defaults() {
    let state = test_utils::test_state().await;
    let app = create_app(state.clone());

    let body = json!({
        "algorithmId": "critical-path",
        "scheduleData": {
            "resources": [],
            "events": [],
            "metadata": {}
        }
    });

    let (status, response) = post_json(app, "/optimization/run", &body).await;
    assert_eq!(status, StatusCode::CREATED, "body: {response}");
    assert_eq!(response["assignmentCount"], 0);

    let schedule_id = response["scheduleId"]
        .as_str()
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .expect("schedule id returned");
    let schedule = ScheduleRepository::new(&state.db)
        .get(schedule_id)
        .await
        .expect("schedule persisted");
    assert_eq!(schedule.created_by, "system");

    let parameters = schedule.parameters.expect("run parameters stored");
    assert_eq!(parameters["objectives"], json!(["minimize_makespan"]));
}

#[tokio::test]
async fn schedules_listing_shows_persisted_runs() {
    let state = test_utils::test_state().await;
    let app = create_app(state.clone());

    let (status, _) = post_json(app.clone(), "/optimization/run", &run_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method("GET")
        .uri("/schedules?status=draft")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("handler responds");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value: Value = serde_json::from_slice(&bytes).expect("body is JSON");
    let schedules = value["schedules"].as_array().expect("schedules listed");
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["status"], "draft");
}
