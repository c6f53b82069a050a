//! # Optimization Request Validation
//!
//! This module contains the validation gate for schedule-optimization
//! requests: an untrusted JSON body goes in, a typed and bounded
//! [`OptimizationRunRequest`] comes out, or the request is rejected with one
//! [`Violation`] per broken rule so a client can fix everything in a single
//! round trip.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use thiserror::Error;
use utoipa::ToSchema;

pub mod sanitize;

pub use sanitize::sanitize_value;

/// Maximum accepted request body size, enforced by the HTTP body-parsing
/// middleware before JSON ever reaches this module.
pub const MAX_REQUEST_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Array ceilings for one schedule snapshot. Bounds are inclusive; exceeding
/// one is a validation failure, never a truncation.
pub const MAX_RESOURCES: usize = 1000;
pub const MAX_EVENTS: usize = 10_000;
pub const MAX_DEPENDENCIES: usize = 5000;
pub const MAX_CONSTRAINT_ENTRIES: usize = 100;
pub const MAX_LOCKED_EVENTS: usize = 10_000;
pub const MAX_LOCKED_RESOURCE_INTERVALS: usize = 1000;

/// Upper bound for the engine time limit, in seconds.
pub const MAX_TIME_LIMIT_SECONDS: u64 = 300;

static ALGORITHM_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,100}$").expect("algorithm id pattern compiles"));

/// One violated validation rule, addressed by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    /// Dotted path to the offending field (e.g. `scheduleData.events[3].startDate`)
    pub path: String,
    /// Human-readable description of the broken rule
    pub message: String,
}

/// Aggregated outcome of a failed validation run. Carries every violation at
/// once; the gate never stops at the first problem.
#[derive(Debug, Clone, Error, Serialize, Deserialize, ToSchema)]
#[error("optimization request failed validation with {} violation(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when any violation path starts with the given prefix.
    pub fn mentions(&self, path_prefix: &str) -> bool {
        self.violations.iter().any(|v| v.path.starts_with(path_prefix))
    }
}

/// Optimization objective a run may pursue. Closed set; unknown values are
/// rejected by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    MinimizeMakespan,
    MaximizeUtilization,
    MinimizeCost,
    MinimizeDelays,
    BalanceWorkload,
    MinimizeSetupTime,
}

impl Objective {
    pub const ALL: &'static [Objective] = &[
        Objective::MinimizeMakespan,
        Objective::MaximizeUtilization,
        Objective::MinimizeCost,
        Objective::MinimizeDelays,
        Objective::BalanceWorkload,
        Objective::MinimizeSetupTime,
    ];

    /// Canonical wire representation for this objective.
    pub const fn as_str(self) -> &'static str {
        match self {
            Objective::MinimizeMakespan => "minimize_makespan",
            Objective::MaximizeUtilization => "maximize_utilization",
            Objective::MinimizeCost => "minimize_cost",
            Objective::MinimizeDelays => "minimize_delays",
            Objective::BalanceWorkload => "balance_workload",
            Objective::MinimizeSetupTime => "minimize_setup_time",
        }
    }

    /// Parse the canonical wire representation, if it names a known objective.
    pub fn parse(value: &str) -> Option<Objective> {
        Objective::ALL.iter().copied().find(|o| o.as_str() == value)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time unit used for event durations and dependency lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    pub const ALL: &'static [TimeUnit] =
        &[TimeUnit::Minute, TimeUnit::Hour, TimeUnit::Day, TimeUnit::Week];

    pub const fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
        }
    }

    pub fn parse(value: &str) -> Option<TimeUnit> {
        TimeUnit::ALL.iter().copied().find(|u| u.as_str() == value)
    }
}

/// Precedence edge semantics, numbered per the scheduler wire convention
/// (2 = Finish-to-Start is the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(into = "u8", try_from = "u8")]
pub enum DependencyType {
    StartToStart,
    StartToEnd,
    EndToStart,
    EndToEnd,
}

impl DependencyType {
    pub const fn code(self) -> u8 {
        match self {
            DependencyType::StartToStart => 0,
            DependencyType::StartToEnd => 1,
            DependencyType::EndToStart => 2,
            DependencyType::EndToEnd => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<DependencyType> {
        match code {
            0 => Some(DependencyType::StartToStart),
            1 => Some(DependencyType::StartToEnd),
            2 => Some(DependencyType::EndToStart),
            3 => Some(DependencyType::EndToEnd),
            _ => None,
        }
    }

    /// Legacy two-letter codes still emitted by older scheduler clients.
    pub fn from_alias(alias: &str) -> Option<DependencyType> {
        match alias {
            "SS" => Some(DependencyType::StartToStart),
            "SF" => Some(DependencyType::StartToEnd),
            "FS" => Some(DependencyType::EndToStart),
            "FF" => Some(DependencyType::EndToEnd),
            _ => None,
        }
    }
}

impl From<DependencyType> for u8 {
    fn from(value: DependencyType) -> u8 {
        value.code()
    }
}

impl TryFrom<u8> for DependencyType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DependencyType::from_code(value)
            .ok_or_else(|| format!("invalid dependency type code {value}"))
    }
}

/// A schedulable capacity unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: f64,
}

/// A unit of work placed on a resource timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_unit: Option<TimeUnit>,
    pub manually_scheduled: bool,
    pub locked: bool,
    pub priority: u8,
}

/// A precedence edge between two events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from_event: String,
    pub to_event: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
    pub lag: f64,
    pub lag_unit: TimeUnit,
}

/// Declarative planning constraints for the whole snapshot. Known numeric
/// keys are range-checked; everything else passes through untouched for the
/// engine to interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_makespan: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_resource_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resource_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_setup_time: Option<f64>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: JsonMap<String, Value>,
}

/// Provenance for a snapshot. Every field is optional; `metadata: {}` is a
/// valid submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The bundle handed to one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleData {
    pub resources: Vec<Resource>,
    pub events: Vec<Event>,
    pub dependencies: Vec<Dependency>,
    pub constraints: SnapshotConstraints,
    pub metadata: SnapshotMetadata,
}

/// Engine tuning parameters. `options` is accepted on the wire as a legacy
/// alias for this object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunParameters {
    pub objectives: Vec<Objective>,
    /// Engine time budget in seconds; passed through, not a gate timeout.
    pub time_limit: u64,
    pub incremental_mode: bool,
    pub warm_start: bool,
    #[schema(value_type = Object)]
    pub constraints: JsonMap<String, Value>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            objectives: vec![Objective::MinimizeMakespan],
            time_limit: 60,
            incremental_mode: false,
            warm_start: false,
            constraints: JsonMap::new(),
        }
    }
}

/// A resource-time window the engine must not reschedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInterval {
    pub resource_id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Events and resource intervals pinned against the optimizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LockSet {
    pub events: Vec<String>,
    pub resource_intervals: Vec<ResourceInterval>,
}

/// A fully validated optimization request, defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRunRequest {
    pub algorithm_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub schedule_data: ScheduleData,
    pub parameters: RunParameters,
    pub locks: LockSet,
}

impl OptimizationRunRequest {
    /// Return a sanitized copy of this request with every string field run
    /// through the XSS scrubber. Shape and non-string values are unchanged.
    pub fn sanitized(mut self) -> Self {
        use sanitize::sanitize_text;

        self.algorithm_id = sanitize_text(&self.algorithm_id);
        self.profile_id = self.profile_id.as_deref().map(sanitize_text);

        for resource in &mut self.schedule_data.resources {
            resource.id = sanitize_text(&resource.id);
            resource.name = sanitize_text(&resource.name);
            resource.kind = sanitize_text(&resource.kind);
        }
        for event in &mut self.schedule_data.events {
            event.id = sanitize_text(&event.id);
            event.name = sanitize_text(&event.name);
            event.resource_id = event.resource_id.as_deref().map(sanitize_text);
        }
        for dependency in &mut self.schedule_data.dependencies {
            dependency.id = dependency.id.as_deref().map(sanitize_text);
            dependency.from_event = sanitize_text(&dependency.from_event);
            dependency.to_event = sanitize_text(&dependency.to_event);
        }

        let metadata = &mut self.schedule_data.metadata;
        metadata.schedule_id = metadata.schedule_id.as_deref().map(sanitize_text);
        metadata.plant_id = metadata.plant_id.as_deref().map(sanitize_text);
        metadata.user_id = metadata.user_id.as_deref().map(sanitize_text);
        metadata.description = metadata.description.as_deref().map(sanitize_text);

        self.schedule_data.constraints.extra = sanitize::sanitize_map(
            std::mem::take(&mut self.schedule_data.constraints.extra),
        );
        self.parameters.constraints =
            sanitize::sanitize_map(std::mem::take(&mut self.parameters.constraints));

        for id in &mut self.locks.events {
            *id = sanitize_text(id);
        }
        for interval in &mut self.locks.resource_intervals {
            interval.resource_id = sanitize_text(&interval.resource_id);
        }

        self
    }
}

/// Validate an untrusted JSON body into a typed [`OptimizationRunRequest`].
///
/// All rules are checked before returning: the error carries one entry per
/// violation so the caller can surface the complete list as a 400 response.
/// Unknown extra fields are ignored. Nothing is clamped or auto-corrected;
/// an out-of-range value rejects the whole request.
pub fn validate_optimization_request(
    body: &Value,
) -> Result<OptimizationRunRequest, ValidationReport> {
    let mut cx = Context::default();
    let parsed = parse_request(&mut cx, body);

    match parsed {
        Some(request) if cx.violations.is_empty() => {
            metrics::counter!("scheduling_requests_validated_total").increment(1);
            Ok(request)
        }
        _ => {
            if cx.violations.is_empty() {
                cx.reject_at("", "request body must be a JSON object");
            }
            metrics::counter!("scheduling_requests_rejected_total").increment(1);
            Err(ValidationReport {
                violations: cx.violations,
            })
        }
    }
}

/// Violation collector with a running field path.
#[derive(Default)]
struct Context {
    path: Vec<String>,
    violations: Vec<Violation>,
}

impl Context {
    fn enter(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    fn exit(&mut self) {
        self.path.pop();
    }

    fn scoped<T>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter(segment);
        let out = f(self);
        self.exit();
        out
    }

    fn current_path(&self) -> String {
        let mut rendered = String::new();
        for segment in &self.path {
            if segment.starts_with('[') {
                rendered.push_str(segment);
            } else {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(segment);
            }
        }
        rendered
    }

    fn reject(&mut self, message: impl Into<String>) {
        let path = self.current_path();
        self.violations.push(Violation {
            path,
            message: message.into(),
        });
    }

    fn reject_at(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }
}

fn parse_request(cx: &mut Context, body: &Value) -> Option<OptimizationRunRequest> {
    let Some(object) = body.as_object() else {
        cx.reject("request body must be a JSON object");
        return None;
    };

    let algorithm_id = cx.scoped("algorithmId", |cx| {
        parse_algorithm_id(cx, object.get("algorithmId"))
    });
    let profile_id = cx.scoped("profileId", |cx| {
        parse_optional_string(cx, object.get("profileId"), 1, 100)
    });

    let schedule_data = match object.get("scheduleData") {
        Some(value) => cx.scoped("scheduleData", |cx| parse_schedule_data(cx, value)),
        None => {
            cx.reject_at("scheduleData", "required field is missing");
            None
        }
    };

    // `options` is the legacy alias for `parameters`; the canonical name wins
    // when both are present.
    let parameters_value = object.get("parameters").or_else(|| object.get("options"));
    let parameters = match parameters_value {
        Some(value) => cx.scoped("parameters", |cx| parse_parameters(cx, value)),
        None => Some(RunParameters::default()),
    };

    let locks = match object.get("locks") {
        Some(value) => cx.scoped("locks", |cx| parse_locks(cx, value)),
        None => Some(LockSet::default()),
    };

    Some(OptimizationRunRequest {
        algorithm_id: algorithm_id?,
        profile_id: profile_id?,
        schedule_data: schedule_data?,
        parameters: parameters?,
        locks: locks?,
    })
}

fn parse_algorithm_id(cx: &mut Context, value: Option<&Value>) -> Option<String> {
    let Some(value) = value else {
        cx.reject("required field is missing");
        return None;
    };
    let Some(text) = value.as_str() else {
        cx.reject("expected a string");
        return None;
    };
    if !ALGORITHM_ID_PATTERN.is_match(text) {
        cx.reject("invalid algorithm ID format (letters, digits, hyphen, underscore; max 100 chars)");
        return None;
    }
    Some(text.to_string())
}

fn parse_schedule_data(cx: &mut Context, value: &Value) -> Option<ScheduleData> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let resources = cx.scoped("resources", |cx| {
        parse_bounded_array(cx, object.get("resources"), MAX_RESOURCES, true, parse_resource)
    });
    let events = cx.scoped("events", |cx| {
        parse_bounded_array(cx, object.get("events"), MAX_EVENTS, true, parse_event)
    });
    let dependencies = cx.scoped("dependencies", |cx| {
        parse_bounded_array(
            cx,
            object.get("dependencies"),
            MAX_DEPENDENCIES,
            false,
            parse_dependency,
        )
    });
    let constraints = match object.get("constraints") {
        Some(value) => cx.scoped("constraints", |cx| parse_constraints(cx, value)),
        None => Some(SnapshotConstraints::default()),
    };
    let metadata = match object.get("metadata") {
        Some(value) => cx.scoped("metadata", |cx| parse_metadata(cx, value)),
        None => Some(SnapshotMetadata::default()),
    };

    Some(ScheduleData {
        resources: resources?,
        events: events?,
        dependencies: dependencies?,
        constraints: constraints?,
        metadata: metadata?,
    })
}

fn parse_bounded_array<T>(
    cx: &mut Context,
    value: Option<&Value>,
    ceiling: usize,
    required: bool,
    parse_item: impl Fn(&mut Context, &Value) -> Option<T>,
) -> Option<Vec<T>> {
    let Some(value) = value else {
        if required {
            cx.reject("required field is missing");
            return None;
        }
        return Some(Vec::new());
    };
    let Some(items) = value.as_array() else {
        cx.reject("expected an array");
        return None;
    };
    if items.len() > ceiling {
        cx.reject(format!("too many items (limit {ceiling}, got {})", items.len()));
        return None;
    }

    let mut parsed = Vec::with_capacity(items.len());
    let mut any_failed = false;
    for (index, item) in items.iter().enumerate() {
        match cx.scoped(format!("[{index}]"), |cx| parse_item(cx, item)) {
            Some(item) => parsed.push(item),
            None => any_failed = true,
        }
    }
    if any_failed { None } else { Some(parsed) }
}

fn parse_resource(cx: &mut Context, value: &Value) -> Option<Resource> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let id = cx.scoped("id", |cx| parse_required_string(cx, object.get("id"), 1, 100));
    let name = cx.scoped("name", |cx| {
        parse_required_string(cx, object.get("name"), 1, 255)
    });
    let kind = cx.scoped("type", |cx| {
        parse_optional_string(cx, object.get("type"), 1, 100)
    });
    let capacity = cx.scoped("capacity", |cx| {
        parse_optional_number(cx, object.get("capacity"), NumberRule::Positive)
    });

    Some(Resource {
        id: id?,
        name: name?,
        kind: kind?.unwrap_or_else(|| "default".to_string()),
        capacity: capacity?.unwrap_or(1.0),
    })
}

fn parse_event(cx: &mut Context, value: &Value) -> Option<Event> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let id = cx.scoped("id", |cx| parse_required_string(cx, object.get("id"), 1, 100));
    let name = cx.scoped("name", |cx| {
        parse_required_string(cx, object.get("name"), 1, 255)
    });
    let resource_id = cx.scoped("resourceId", |cx| {
        parse_optional_string(cx, object.get("resourceId"), 1, 100)
    });
    let start_date = cx.scoped("startDate", |cx| {
        parse_optional_datetime(cx, object.get("startDate"))
    });
    let end_date = cx.scoped("endDate", |cx| {
        parse_optional_datetime(cx, object.get("endDate"))
    });
    let duration = cx.scoped("duration", |cx| {
        parse_optional_number(cx, object.get("duration"), NumberRule::NonNegative)
    });
    let duration_unit = cx.scoped("durationUnit", |cx| {
        parse_optional_time_unit(cx, object.get("durationUnit"))
    });
    let manually_scheduled = cx.scoped("manuallyScheduled", |cx| {
        parse_optional_bool(cx, object.get("manuallyScheduled"))
    });
    let locked = cx.scoped("locked", |cx| parse_optional_bool(cx, object.get("locked")));
    let priority = cx.scoped("priority", |cx| {
        parse_optional_integer(cx, object.get("priority"), 0, 10)
    });

    Some(Event {
        id: id?,
        name: name?,
        resource_id: resource_id?,
        start_date: start_date?,
        end_date: end_date?,
        duration: duration?.unwrap_or(0.0),
        duration_unit: duration_unit?,
        manually_scheduled: manually_scheduled?.unwrap_or(false),
        locked: locked?.unwrap_or(false),
        priority: priority?.map_or(5, |p| p as u8),
    })
}

fn parse_dependency(cx: &mut Context, value: &Value) -> Option<Dependency> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let id = cx.scoped("id", |cx| parse_optional_string(cx, object.get("id"), 1, 100));

    // `from`/`to` are the legacy aliases still used by older clients.
    let from_value = object.get("fromEvent").or_else(|| object.get("from"));
    let from_event = cx.scoped("fromEvent", |cx| {
        parse_required_string(cx, from_value, 1, 100)
    });
    let to_value = object.get("toEvent").or_else(|| object.get("to"));
    let to_event = cx.scoped("toEvent", |cx| parse_required_string(cx, to_value, 1, 100));

    let kind = cx.scoped("type", |cx| parse_dependency_type(cx, object.get("type")));
    let lag = cx.scoped("lag", |cx| {
        parse_optional_number(cx, object.get("lag"), NumberRule::Any)
    });
    let lag_unit = cx.scoped("lagUnit", |cx| {
        parse_optional_time_unit(cx, object.get("lagUnit"))
    });

    Some(Dependency {
        id: id?,
        from_event: from_event?,
        to_event: to_event?,
        kind: kind?,
        lag: lag?.unwrap_or(0.0),
        lag_unit: lag_unit?.unwrap_or(TimeUnit::Day),
    })
}

fn parse_dependency_type(cx: &mut Context, value: Option<&Value>) -> Option<DependencyType> {
    let Some(value) = value else {
        return Some(DependencyType::EndToStart);
    };
    if let Some(code) = value.as_u64() {
        return match u8::try_from(code).ok().and_then(DependencyType::from_code) {
            Some(kind) => Some(kind),
            None => {
                cx.reject("invalid enum value, expected 0-3");
                None
            }
        };
    }
    if let Some(alias) = value.as_str() {
        return match DependencyType::from_alias(alias) {
            Some(kind) => Some(kind),
            None => {
                cx.reject("invalid enum value, expected 0-3 or one of SS, SF, FS, FF");
                None
            }
        };
    }
    cx.reject("expected an integer 0-3 or a two-letter code");
    None
}

fn parse_constraints(cx: &mut Context, value: &Value) -> Option<SnapshotConstraints> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };
    if object.len() > MAX_CONSTRAINT_ENTRIES {
        cx.reject(format!(
            "too many items (limit {MAX_CONSTRAINT_ENTRIES}, got {})",
            object.len()
        ));
        return None;
    }

    let max_makespan = cx.scoped("maxMakespan", |cx| {
        parse_optional_number(cx, object.get("maxMakespan"), NumberRule::Positive)
    });
    let min_resource_utilization = cx.scoped("minResourceUtilization", |cx| {
        parse_optional_number(cx, object.get("minResourceUtilization"), NumberRule::UnitInterval)
    });
    let max_resource_utilization = cx.scoped("maxResourceUtilization", |cx| {
        parse_optional_number(cx, object.get("maxResourceUtilization"), NumberRule::UnitInterval)
    });
    let max_wait_time = cx.scoped("maxWaitTime", |cx| {
        parse_optional_number(cx, object.get("maxWaitTime"), NumberRule::Positive)
    });
    let max_setup_time = cx.scoped("maxSetupTime", |cx| {
        parse_optional_number(cx, object.get("maxSetupTime"), NumberRule::Positive)
    });

    const KNOWN_KEYS: &[&str] = &[
        "maxMakespan",
        "minResourceUtilization",
        "maxResourceUtilization",
        "maxWaitTime",
        "maxSetupTime",
    ];
    let extra: JsonMap<String, Value> = object
        .iter()
        .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(SnapshotConstraints {
        max_makespan: max_makespan?,
        min_resource_utilization: min_resource_utilization?,
        max_resource_utilization: max_resource_utilization?,
        max_wait_time: max_wait_time?,
        max_setup_time: max_setup_time?,
        extra,
    })
}

fn parse_metadata(cx: &mut Context, value: &Value) -> Option<SnapshotMetadata> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let schedule_id = cx.scoped("scheduleId", |cx| {
        parse_optional_string(cx, object.get("scheduleId"), 1, 100)
    });
    let plant_id = cx.scoped("plantId", |cx| {
        parse_optional_string(cx, object.get("plantId"), 1, 100)
    });
    let user_id = cx.scoped("userId", |cx| {
        parse_optional_string(cx, object.get("userId"), 1, 100)
    });
    let timestamp = cx.scoped("timestamp", |cx| {
        parse_optional_datetime(cx, object.get("timestamp"))
    });
    let description = cx.scoped("description", |cx| {
        parse_optional_string(cx, object.get("description"), 0, 500)
    });

    Some(SnapshotMetadata {
        schedule_id: schedule_id?,
        plant_id: plant_id?,
        user_id: user_id?,
        timestamp: timestamp?,
        description: description?,
    })
}

fn parse_parameters(cx: &mut Context, value: &Value) -> Option<RunParameters> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let objectives = match object.get("objectives") {
        Some(value) => cx.scoped("objectives", |cx| parse_objectives(cx, value)),
        None => Some(vec![Objective::MinimizeMakespan]),
    };
    let time_limit = cx.scoped("timeLimit", |cx| {
        parse_optional_integer(cx, object.get("timeLimit"), 1, MAX_TIME_LIMIT_SECONDS)
    });
    let incremental_mode = cx.scoped("incrementalMode", |cx| {
        parse_optional_bool(cx, object.get("incrementalMode"))
    });
    let warm_start = cx.scoped("warmStart", |cx| {
        parse_optional_bool(cx, object.get("warmStart"))
    });
    let constraints = match object.get("constraints") {
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            cx.scoped("constraints", |cx| cx.reject("expected an object"));
            None
        }
        None => Some(JsonMap::new()),
    };

    Some(RunParameters {
        objectives: objectives?,
        time_limit: time_limit?.unwrap_or(60),
        incremental_mode: incremental_mode?.unwrap_or(false),
        warm_start: warm_start?.unwrap_or(false),
        constraints: constraints?,
    })
}

fn parse_objectives(cx: &mut Context, value: &Value) -> Option<Vec<Objective>> {
    let Some(items) = value.as_array() else {
        cx.reject("expected an array");
        return None;
    };
    if items.is_empty() {
        return Some(vec![Objective::MinimizeMakespan]);
    }

    let mut objectives = Vec::with_capacity(items.len());
    let mut any_failed = false;
    for (index, item) in items.iter().enumerate() {
        cx.scoped(format!("[{index}]"), |cx| match item.as_str() {
            Some(text) => match Objective::parse(text) {
                Some(objective) => objectives.push(objective),
                None => {
                    cx.reject(format!(
                        "invalid enum value '{text}', expected one of {}",
                        Objective::ALL
                            .iter()
                            .map(|o| o.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                    any_failed = true;
                }
            },
            None => {
                cx.reject("expected a string");
                any_failed = true;
            }
        });
    }
    if any_failed { None } else { Some(objectives) }
}

fn parse_locks(cx: &mut Context, value: &Value) -> Option<LockSet> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let events = cx.scoped("events", |cx| {
        parse_bounded_array(cx, object.get("events"), MAX_LOCKED_EVENTS, false, |cx, item| {
            match item.as_str() {
                Some(text) if !text.is_empty() && text.len() <= 100 => Some(text.to_string()),
                Some(_) => {
                    cx.reject("must be between 1 and 100 characters");
                    None
                }
                None => {
                    cx.reject("expected a string");
                    None
                }
            }
        })
    });
    let resource_intervals = cx.scoped("resourceIntervals", |cx| {
        parse_bounded_array(
            cx,
            object.get("resourceIntervals"),
            MAX_LOCKED_RESOURCE_INTERVALS,
            false,
            parse_resource_interval,
        )
    });

    Some(LockSet {
        events: events?,
        resource_intervals: resource_intervals?,
    })
}

fn parse_resource_interval(cx: &mut Context, value: &Value) -> Option<ResourceInterval> {
    let Some(object) = value.as_object() else {
        cx.reject("expected an object");
        return None;
    };

    let resource_id = cx.scoped("resourceId", |cx| {
        parse_required_string(cx, object.get("resourceId"), 1, 100)
    });
    let start = cx.scoped("start", |cx| parse_required_datetime(cx, object.get("start")));
    let end = cx.scoped("end", |cx| parse_required_datetime(cx, object.get("end")));

    Some(ResourceInterval {
        resource_id: resource_id?,
        start: start?,
        end: end?,
    })
}

// Field-level helpers. Each pushes a violation and returns None on failure so
// callers can keep walking sibling fields.

fn parse_required_string(
    cx: &mut Context,
    value: Option<&Value>,
    min: usize,
    max: usize,
) -> Option<String> {
    let Some(value) = value else {
        cx.reject("required field is missing");
        return None;
    };
    check_string(cx, value, min, max)
}

fn parse_optional_string(
    cx: &mut Context,
    value: Option<&Value>,
    min: usize,
    max: usize,
) -> Option<Option<String>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(value) => check_string(cx, value, min, max).map(Some),
    }
}

fn check_string(cx: &mut Context, value: &Value, min: usize, max: usize) -> Option<String> {
    let Some(text) = value.as_str() else {
        cx.reject("expected a string");
        return None;
    };
    let length = text.chars().count();
    if length < min || length > max {
        cx.reject(format!("must be between {min} and {max} characters"));
        return None;
    }
    Some(text.to_string())
}

fn parse_required_datetime(
    cx: &mut Context,
    value: Option<&Value>,
) -> Option<DateTime<FixedOffset>> {
    let Some(value) = value else {
        cx.reject("required field is missing");
        return None;
    };
    check_datetime(cx, value)
}

fn parse_optional_datetime(
    cx: &mut Context,
    value: Option<&Value>,
) -> Option<Option<DateTime<FixedOffset>>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(value) => check_datetime(cx, value).map(Some),
    }
}

fn check_datetime(cx: &mut Context, value: &Value) -> Option<DateTime<FixedOffset>> {
    let Some(text) = value.as_str() else {
        cx.reject("expected an ISO 8601 date-time string");
        return None;
    };
    // Date-only strings lack the time component needed for duration math and
    // are rejected outright rather than assumed to be midnight.
    match DateTime::parse_from_rfc3339(text) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            cx.reject("invalid ISO 8601 date-time (time component and offset are required)");
            None
        }
    }
}

fn parse_optional_time_unit(cx: &mut Context, value: Option<&Value>) -> Option<Option<TimeUnit>> {
    let Some(value) = value else {
        return Some(None);
    };
    if value.is_null() {
        return Some(None);
    }
    let Some(text) = value.as_str() else {
        cx.reject("expected a string");
        return None;
    };
    match TimeUnit::parse(text) {
        Some(unit) => Some(Some(unit)),
        None => {
            cx.reject(format!(
                "invalid enum value '{text}', expected one of {}",
                TimeUnit::ALL
                    .iter()
                    .map(|u| u.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            None
        }
    }
}

#[derive(Clone, Copy)]
enum NumberRule {
    Any,
    NonNegative,
    Positive,
    UnitInterval,
}

fn parse_optional_number(
    cx: &mut Context,
    value: Option<&Value>,
    rule: NumberRule,
) -> Option<Option<f64>> {
    let Some(value) = value else {
        return Some(None);
    };
    if value.is_null() {
        return Some(None);
    }
    let Some(number) = value.as_f64() else {
        cx.reject("expected a number");
        return None;
    };
    let ok = match rule {
        NumberRule::Any => number.is_finite(),
        NumberRule::NonNegative => number.is_finite() && number >= 0.0,
        NumberRule::Positive => number.is_finite() && number > 0.0,
        NumberRule::UnitInterval => number.is_finite() && (0.0..=1.0).contains(&number),
    };
    if !ok {
        let message = match rule {
            NumberRule::Any => "must be a finite number",
            NumberRule::NonNegative => "must be zero or greater",
            NumberRule::Positive => "must be a positive number",
            NumberRule::UnitInterval => "must be between 0 and 1",
        };
        cx.reject(message);
        return None;
    }
    Some(Some(number))
}

fn parse_optional_integer(
    cx: &mut Context,
    value: Option<&Value>,
    min: u64,
    max: u64,
) -> Option<Option<u64>> {
    let Some(value) = value else {
        return Some(None);
    };
    if value.is_null() {
        return Some(None);
    }
    let Some(number) = value.as_u64() else {
        cx.reject(format!("expected an integer between {min} and {max}"));
        return None;
    };
    if number < min || number > max {
        cx.reject(format!("must be between {min} and {max}"));
        return None;
    }
    Some(Some(number))
}

fn parse_optional_bool(cx: &mut Context, value: Option<&Value>) -> Option<Option<bool>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::Bool(flag)) => Some(Some(*flag)),
        Some(_) => {
            cx.reject("expected a boolean");
            None
        }
    }
}

#[cfg(test)]
mod tests;
