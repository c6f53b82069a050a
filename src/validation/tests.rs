//! Unit tests for the optimization request gate and the payload sanitizer.

use super::sanitize::{sanitize_text, sanitize_value};
use super::*;
use serde_json::json;

fn valid_request() -> Value {
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

fn event_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Op",
        "startDate": "2024-01-01T10:00:00Z",
        "endDate": "2024-01-01T11:00:00Z"
    })
}

fn with_events(events: Vec<Value>) -> Value {
    let mut request = valid_request();
    request["scheduleData"]["events"] = Value::Array(events);
    request
}

#[test]
fn accepts_complete_valid_request() {
    let request = validate_optimization_request(&valid_request()).expect("request is valid");
    assert_eq!(request.algorithm_id, "forward-scheduling");
    assert_eq!(request.schedule_data.events.len(), 1);
    assert_eq!(
        request.parameters.objectives,
        vec![Objective::MinimizeMakespan, Objective::MaximizeUtilization]
    );
    assert_eq!(request.parameters.time_limit, 60);
}

#[test]
fn accepts_request_without_optional_fields_and_applies_defaults() {
    let minimal = json!({
        "algorithmId": "critical-path",
        "scheduleData": {
            "resources": [],
            "events": [],
            "metadata": {}
        }
    });

    let request = validate_optimization_request(&minimal).expect("minimal request is valid");
    assert!(request.profile_id.is_none());
    assert!(request.schedule_data.dependencies.is_empty());
    assert_eq!(request.parameters.objectives, vec![Objective::MinimizeMakespan]);
    assert_eq!(request.parameters.time_limit, 60);
    assert!(!request.parameters.incremental_mode);
    assert!(request.locks.events.is_empty());
    assert!(request.locks.resource_intervals.is_empty());
}

#[test]
fn applies_event_defaults() {
    let request = with_events(vec![json!({ "id": "E1", "name": "Op" })]);
    let parsed = validate_optimization_request(&request).expect("bare event is valid");
    let event = &parsed.schedule_data.events[0];
    assert_eq!(event.duration, 0.0);
    assert_eq!(event.priority, 5);
    assert!(!event.locked);
    assert!(!event.manually_scheduled);
}

#[test]
fn accepts_options_as_legacy_alias_for_parameters() {
    let mut request = valid_request();
    let parameters = request
        .as_object_mut()
        .and_then(|o| o.remove("parameters"))
        .expect("fixture has parameters");
    request["options"] = parameters;

    let parsed = validate_optimization_request(&request).expect("alias accepted");
    assert_eq!(parsed.parameters.time_limit, 60);
}

#[test]
fn ignores_unknown_top_level_fields() {
    let mut request = valid_request();
    request["futureKnob"] = json!({"enabled": true});
    assert!(validate_optimization_request(&request).is_ok());
}

#[test]
fn rejects_invalid_algorithm_id_format() {
    let mut request = valid_request();
    request["algorithmId"] = json!("invalid algorithm!");

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].path, "algorithmId");
    assert!(report.violations[0].message.contains("invalid algorithm ID format"));
}

#[test]
fn rejects_algorithm_id_over_100_chars() {
    let mut request = valid_request();
    request["algorithmId"] = json!("a".repeat(101));
    let report = validate_optimization_request(&request).expect_err("must reject");
    assert!(report.mentions("algorithmId"));
}

#[test]
fn rejects_missing_required_fields() {
    let report = validate_optimization_request(&json!({})).expect_err("must reject");
    assert!(report.mentions("algorithmId"));
    assert!(report.mentions("scheduleData"));
}

#[test]
fn rejects_date_without_time_component() {
    let request = with_events(vec![json!({
        "id": "E1",
        "name": "Op1",
        "startDate": "2024-01-01",
        "endDate": "2024-01-01T12:00:00Z"
    })]);

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].path, "scheduleData.events[0].startDate");
    assert!(report.violations[0].message.contains("ISO 8601"));
}

#[test]
fn accepts_iso_dates_with_offsets_and_fractional_seconds() {
    let request = with_events(vec![
        json!({
            "id": "E1",
            "name": "Op1",
            "startDate": "2024-01-01T10:00:00Z",
            "endDate": "2024-01-01T12:00:00+02:00"
        }),
        json!({
            "id": "E2",
            "name": "Op2",
            "startDate": "2024-01-01T14:00:00.123Z",
            "endDate": "2024-01-01T16:00:00-05:00"
        }),
    ]);

    assert!(validate_optimization_request(&request).is_ok());
}

#[test]
fn rejects_events_over_ceiling_and_accepts_at_ceiling() {
    let over = with_events((0..MAX_EVENTS + 1).map(|_| event_json("E1")).collect());
    let report = validate_optimization_request(&over).expect_err("must reject");
    assert_eq!(report.violations[0].path, "scheduleData.events");
    assert!(report.violations[0].message.contains("too many items"));

    let at = with_events((0..MAX_EVENTS).map(|_| event_json("E1")).collect());
    assert!(validate_optimization_request(&at).is_ok());
}

#[test]
fn rejects_resources_over_ceiling() {
    let mut request = valid_request();
    request["scheduleData"]["resources"] = Value::Array(
        (0..MAX_RESOURCES + 1)
            .map(|_| json!({ "id": "R1", "name": "Resource" }))
            .collect(),
    );

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations[0].path, "scheduleData.resources");
    assert!(report.violations[0].message.contains("too many items"));
}

#[test]
fn rejects_dependencies_over_ceiling() {
    let mut request = valid_request();
    request["scheduleData"]["dependencies"] = Value::Array(
        (0..MAX_DEPENDENCIES + 1)
            .map(|_| json!({ "from": "E1", "to": "E2", "type": "FS" }))
            .collect(),
    );

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert!(report.mentions("scheduleData.dependencies"));
    assert!(report.violations[0].message.contains("too many items"));
}

#[test]
fn maps_legacy_dependency_aliases() {
    let mut request = valid_request();
    request["scheduleData"]["events"] = json!([event_json("E1"), event_json("E2")]);
    request["scheduleData"]["dependencies"] =
        json!([{ "from": "E1", "to": "E2", "type": "FS", "lag": -1.5, "lagUnit": "hour" }]);

    let parsed = validate_optimization_request(&request).expect("aliases accepted");
    let dependency = &parsed.schedule_data.dependencies[0];
    assert_eq!(dependency.from_event, "E1");
    assert_eq!(dependency.to_event, "E2");
    assert_eq!(dependency.kind, DependencyType::EndToStart);
    assert_eq!(dependency.lag, -1.5);
    assert_eq!(dependency.lag_unit, TimeUnit::Hour);
}

#[test]
fn dependency_type_defaults_to_finish_to_start() {
    let mut request = valid_request();
    request["scheduleData"]["dependencies"] = json!([{ "fromEvent": "E1", "toEvent": "E2" }]);
    let parsed = validate_optimization_request(&request).expect("default applied");
    assert_eq!(parsed.schedule_data.dependencies[0].kind, DependencyType::EndToStart);
}

#[test]
fn accepts_each_valid_objective() {
    for objective in Objective::ALL {
        let mut request = valid_request();
        request["parameters"]["objectives"] = json!([objective.as_str()]);
        assert!(
            validate_optimization_request(&request).is_ok(),
            "objective {objective} must be accepted"
        );
    }
}

#[test]
fn rejects_unknown_objectives() {
    let mut request = valid_request();
    request["parameters"]["objectives"] = json!(["invalid_objective", "minimize_makespan"]);

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations[0].path, "parameters.objectives[0]");
    assert!(report.violations[0].message.contains("invalid enum value"));
}

#[test]
fn rejects_out_of_range_numeric_constraints_all_at_once() {
    let mut request = valid_request();
    request["scheduleData"]["constraints"] = json!({
        "maxMakespan": -1,
        "minResourceUtilization": 1.5,
        "maxResourceUtilization": -0.1
    });

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations.len(), 3);
    assert!(report.mentions("scheduleData.constraints.maxMakespan"));
    assert!(report.mentions("scheduleData.constraints.minResourceUtilization"));
    assert!(report.mentions("scheduleData.constraints.maxResourceUtilization"));
}

#[test]
fn accepts_valid_constraint_ranges_and_passes_unknown_keys_through() {
    let mut request = valid_request();
    request["scheduleData"]["constraints"] = json!({
        "maxMakespan": 720,
        "minResourceUtilization": 0.0,
        "maxResourceUtilization": 1.0,
        "maxWaitTime": 60,
        "maxSetupTime": 30,
        "changeoverMatrix": "compact"
    });

    let parsed = validate_optimization_request(&request).expect("constraints are valid");
    let constraints = &parsed.schedule_data.constraints;
    assert_eq!(constraints.max_resource_utilization, Some(1.0));
    assert_eq!(constraints.extra.get("changeoverMatrix"), Some(&json!("compact")));
}

#[test]
fn rejects_time_limit_over_cap() {
    let mut request = valid_request();
    request["parameters"]["timeLimit"] = json!(MAX_TIME_LIMIT_SECONDS + 1);
    let report = validate_optimization_request(&request).expect_err("must reject");
    assert!(report.mentions("parameters.timeLimit"));
}

#[test]
fn validates_lock_set_bounds_and_intervals() {
    let mut request = valid_request();
    request["locks"] = json!({
        "events": ["E1", "E2"],
        "resourceIntervals": [
            { "resourceId": "R1", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z" }
        ]
    });
    let parsed = validate_optimization_request(&request).expect("locks are valid");
    assert_eq!(parsed.locks.events, vec!["E1", "E2"]);
    assert_eq!(parsed.locks.resource_intervals.len(), 1);

    request["locks"]["resourceIntervals"][0]["end"] = json!("2024-01-02");
    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations[0].path, "locks.resourceIntervals[0].end");
}

#[test]
fn aggregates_all_violations_in_one_report() {
    let request = json!({
        "algorithmId": "bad id!",
        "scheduleData": {
            "resources": [{ "id": "", "name": "Machine" }],
            "events": [{ "id": "E1", "name": "Op", "startDate": "2024-01-01" }]
        },
        "parameters": { "timeLimit": 0 }
    });

    let report = validate_optimization_request(&request).expect_err("must reject");
    assert_eq!(report.violations.len(), 4);
    assert!(report.mentions("algorithmId"));
    assert!(report.mentions("scheduleData.resources[0].id"));
    assert!(report.mentions("scheduleData.events[0].startDate"));
    assert!(report.mentions("parameters.timeLimit"));
}

// Sanitizer

#[test]
fn removes_script_tags_with_their_content() {
    let malicious = json!({
        "metadata": {
            "description": "<script>alert(\"XSS\")</script>This is a description",
            "notes": "Normal text <script src=\"evil.js\"></script> more text"
        }
    });

    let sanitized = sanitize_value(&malicious);
    assert_eq!(sanitized["metadata"]["description"], "This is a description");
    assert_eq!(sanitized["metadata"]["notes"], "Normal text  more text");
}

#[test]
fn removes_html_event_handlers_with_their_tags() {
    let malicious = json!({
        "events": [
            {
                "name": "<img src=x onerror=alert(1)>",
                "description": "<div onclick=\"hack()\">Click me</div>"
            }
        ],
        "metadata": { "title": "<button onmouseover=\"steal()\">Hover</button>" }
    });

    let sanitized = sanitize_value(&malicious);
    let name = sanitized["events"][0]["name"].as_str().expect("string survives");
    assert!(!name.contains("onerror"));
    assert!(!name.contains('<'));
    let description = sanitized["events"][0]["description"]
        .as_str()
        .expect("string survives");
    assert_eq!(description, "Click me");
    let title = sanitized["metadata"]["title"].as_str().expect("string survives");
    assert_eq!(title, "Hover");
}

#[test]
fn preserves_non_bracket_special_characters() {
    assert_eq!(sanitize_text("Smith & Sons"), "Smith & Sons");
    assert_eq!(sanitize_text("E = mc²"), "E = mc²");

    let stripped = sanitize_text("Temperature > 100°C & pressure < 50 bar");
    assert!(stripped.contains("100°C"));
    assert!(stripped.contains('&'));
    assert!(!stripped.contains('<'));
    assert!(!stripped.contains('>'));
}

#[test]
fn sanitization_is_idempotent() {
    for input in [
        "Temperature > 100°C & pressure < 50 bar",
        "<script>alert(1)</script>Event 1",
        "plain text",
        "<img src=x onerror=alert(1)>",
    ] {
        let once = sanitize_text(input);
        assert_eq!(sanitize_text(&once), once, "sanitize must be idempotent for {input:?}");
    }
}

#[test]
fn passes_sql_looking_text_through() {
    // SQL neutralization is the query layer's job; the sanitizer only touches
    // angle-bracket content.
    assert_eq!(sanitize_text("1 OR 1=1"), "1 OR 1=1");
}

#[test]
fn sanitizes_nested_objects_and_arrays() {
    let nested = json!({
        "events": [
            {
                "id": "E1",
                "name": "<script>alert(1)</script>Event 1",
                "metadata": {
                    "notes": "<img src=x onerror=alert(2)>",
                    "tags": ["<script>tag1</script>", "safe-tag", "<div onclick=\"x\">tag3</div>"]
                }
            }
        ],
        "resources": [
            {
                "id": "R1",
                "name": "Resource<script>hack()</script>",
                "properties": { "description": "<iframe src=\"evil.com\"></iframe>Machine" }
            }
        ]
    });

    let sanitized = sanitize_value(&nested);
    assert_eq!(sanitized["events"][0]["name"], "Event 1");
    assert_eq!(sanitized["events"][0]["metadata"]["notes"], "");
    assert_eq!(sanitized["events"][0]["metadata"]["tags"][0], "");
    assert_eq!(sanitized["events"][0]["metadata"]["tags"][1], "safe-tag");
    assert_eq!(sanitized["events"][0]["metadata"]["tags"][2], "tag3");
    assert_eq!(sanitized["resources"][0]["name"], "Resource");
    assert_eq!(sanitized["resources"][0]["properties"]["description"], "Machine");
}

#[test]
fn leaves_non_string_leaves_untouched() {
    let value = json!({ "count": 3, "ratio": 0.25, "flag": true, "nothing": null });
    assert_eq!(sanitize_value(&value), value);
}

#[test]
fn handles_large_payloads_quickly() {
    let large = json!({
        "events": (0..1000)
            .map(|i| json!({
                "name": format!("<script>alert()</script>Event {i}"),
                "description": "A very long description ".repeat(100)
            }))
            .collect::<Vec<_>>(),
        "resources": (0..100)
            .map(|_| json!({
                "name": "<div>Resource</div>",
                "metadata": { "notes": "<img src=x>".repeat(50) }
            }))
            .collect::<Vec<_>>()
    });

    let started = std::time::Instant::now();
    let sanitized = sanitize_value(&large);
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
    assert_eq!(sanitized["events"][0]["name"], "Event 0");
    assert_eq!(sanitized["resources"][0]["name"], "Resource");
}

#[test]
fn sanitized_request_cleans_free_text_fields() {
    let mut request = valid_request();
    request["scheduleData"]["metadata"]["description"] =
        json!("<script>alert(1)</script>Week 3 plan");
    request["scheduleData"]["events"][0]["name"] = json!("<b>Operation 1</b>");

    let parsed = validate_optimization_request(&request).expect("request is valid");
    let sanitized = parsed.sanitized();
    assert_eq!(
        sanitized.schedule_data.metadata.description.as_deref(),
        Some("Week 3 plan")
    );
    assert_eq!(sanitized.schedule_data.events[0].name, "Operation 1");
    // Identifier fields never carry brackets, so sanitizing is shape-preserving.
    assert_eq!(sanitized.algorithm_id, "forward-scheduling");
}
