//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Scheduling API.

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::engine::OptimizationEngine;
use crate::handlers;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub engine: Arc<dyn OptimizationEngine>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.optimizer.max_body_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/optimization/run", post(handlers::optimize::run_optimization))
        .route("/schedules", get(handlers::schedules::list_schedules))
        .route(
            "/schedules/{id}",
            get(handlers::schedules::get_schedule).delete(handlers::schedules::delete_schedule),
        )
        .route(
            "/schedules/{id}/transition",
            post(handlers::schedules::transition_schedule),
        )
        .route(
            "/schedules/{id}/publish",
            post(handlers::schedules::publish_schedule),
        )
        .route(
            "/schedules/{id}/baseline",
            post(handlers::schedules::set_baseline),
        )
        .route(
            "/schedules/{id}/approvals",
            post(handlers::approvals::create_approval).get(handlers::approvals::list_approvals),
        )
        .route(
            "/schedules/{id}/approvals/decision",
            post(handlers::approvals::record_decision),
        )
        .route(
            "/schedules/{id}/discussions",
            post(handlers::discussions::post_discussion)
                .get(handlers::discussions::list_discussions),
        )
        .route(
            "/discussions/{id}/resolve",
            post(handlers::discussions::resolve_discussion),
        )
        .route(
            "/schedules/{id}/snapshots",
            post(handlers::snapshots::capture_snapshot).get(handlers::snapshots::list_snapshots),
        )
        .route(
            "/schedules/{id}/subscriptions",
            post(handlers::subscriptions::subscribe)
                .get(handlers::subscriptions::list_subscriptions),
        )
        .route("/comparisons", post(handlers::snapshots::compute_comparison))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(with_request_trace_context))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Give every request a correlation id, surfaced in error responses and logs.
async fn with_request_trace_context(request: Request, next: Next) -> Response {
    let trace_id = format!("req-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    telemetry::with_trace_context(TraceContext { trace_id }, next.run(request)).await
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
    engine: Arc<dyn OptimizationEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let state = AppState {
        config: Arc::new(config),
        db,
        engine,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::optimize::run_optimization,
        crate::handlers::schedules::list_schedules,
        crate::handlers::schedules::get_schedule,
        crate::handlers::schedules::delete_schedule,
        crate::handlers::schedules::transition_schedule,
        crate::handlers::schedules::publish_schedule,
        crate::handlers::schedules::set_baseline,
        crate::handlers::approvals::create_approval,
        crate::handlers::approvals::record_decision,
        crate::handlers::approvals::list_approvals,
        crate::handlers::discussions::post_discussion,
        crate::handlers::discussions::list_discussions,
        crate::handlers::discussions::resolve_discussion,
        crate::handlers::snapshots::capture_snapshot,
        crate::handlers::snapshots::list_snapshots,
        crate::handlers::snapshots::compute_comparison,
        crate::handlers::subscriptions::subscribe,
        crate::handlers::subscriptions::list_subscriptions,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::validation::OptimizationRunRequest,
            crate::validation::Violation,
            crate::handlers::optimize::OptimizationRunResponse,
            crate::handlers::types::ScheduleInfo,
            crate::handlers::types::AssignmentInfo,
            crate::handlers::approvals::ApprovalInfo,
            crate::handlers::discussions::DiscussionInfo,
            crate::handlers::snapshots::SnapshotInfo,
            crate::handlers::snapshots::ComparisonInfo,
            crate::handlers::subscriptions::SubscriptionInfo,
        )
    ),
    info(
        title = "Scheduling API",
        description = "API for validating, optimizing, and versioning manufacturing schedules",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
