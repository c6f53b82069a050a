//! # Discussion Endpoint Handlers
//!
//! Threaded comments on a schedule version.

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
use crate::handlers::schedules::parse_schedule_id;
use crate::models::schedule_discussion::{ContextType, Model as DiscussionModel};
use crate::repositories::DiscussionRepository;
use crate::repositories::discussion::NewDiscussion;
use crate::server::AppState;

/// Discussion message information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_discussion_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    pub is_resolved: bool,
    pub is_announcement: bool,
    pub created_at: String,
}

impl From<DiscussionModel> for DiscussionInfo {
    fn from(model: DiscussionModel) -> Self {
        Self {
            id: model.id.to_string(),
            parent_discussion_id: model.parent_discussion_id.map(|id| id.to_string()),
            thread_id: model.thread_id,
            user_id: model.user_id,
            user_name: model.user_name,
            message: model.message,
            context_type: model.context_type,
            context_id: model.context_id,
            is_resolved: model.is_resolved,
            is_announcement: model.is_announcement,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Request body for posting a discussion message
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDiscussionRequest {
    /// Parent message id when replying
    pub parent_discussion_id: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub message: String,
    /// assignment, resource, or general
    pub context_type: Option<String>,
    pub context_id: Option<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub is_announcement: bool,
}

/// Query parameters for listing discussions
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListDiscussionsQuery {
    /// Restrict to one thread
    pub thread_id: Option<String>,
}

/// Post a message or reply on a schedule
#[utoipa::path(
    post,
    path = "/schedules/{id}/discussions",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = PostDiscussionRequest,
    responses(
        (status = 201, description = "Message posted", body = DiscussionInfo),
        (status = 404, description = "Schedule or parent message not found", body = ApiError),
        (status = 409, description = "Parent message belongs to a different schedule", body = ApiError)
    ),
    tag = "discussions"
)]
pub async fn post_discussion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PostDiscussionRequest>,
) -> Result<(StatusCode, Json<DiscussionInfo>), ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    if body.message.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "message must not be empty",
        ));
    }

    let parent_discussion_id = match body.parent_discussion_id.as_deref() {
        Some(raw) => Some(Uuid::from_str(raw).map_err(|_| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "parentDiscussionId must be a valid UUID",
            )
        })?),
        None => None,
    };

    let context_type = match body.context_type.as_deref() {
        Some(raw) => Some(ContextType::parse(raw).ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED".to_string(),
                format!("unknown context type '{raw}'"),
            )
        })?),
        None => None,
    };

    let message = DiscussionRepository::new(&state.db)
        .post(NewDiscussion {
            schedule_id,
            parent_discussion_id,
            user_id: body.user_id,
            user_name: body.user_name,
            user_role: body.user_role,
            message: body.message,
            context_type,
            context_id: body.context_id,
            mentions: body.mentions,
            is_announcement: body.is_announcement,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DiscussionInfo::from(message))))
}

/// List discussions on a schedule, optionally narrowed to one thread
#[utoipa::path(
    get,
    path = "/schedules/{id}/discussions",
    params(("id" = String, Path, description = "Schedule identifier"), ListDiscussionsQuery),
    responses(
        (status = 200, description = "Discussions listed", body = [DiscussionInfo])
    ),
    tag = "discussions"
)]
pub async fn list_discussions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListDiscussionsQuery>,
) -> Result<Json<Vec<DiscussionInfo>>, ApiError> {
    let schedule_id = parse_schedule_id(&id)?;
    let repository = DiscussionRepository::new(&state.db);

    let messages = match query.thread_id.as_deref() {
        Some(thread_id) => repository.list_thread(schedule_id, thread_id).await?,
        None => repository.list_for_schedule(schedule_id).await?,
    };

    Ok(Json(messages.into_iter().map(DiscussionInfo::from).collect()))
}

/// Mark a discussion as resolved
#[utoipa::path(
    post,
    path = "/discussions/{id}/resolve",
    params(("id" = String, Path, description = "Discussion identifier")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Discussion resolved", body = DiscussionInfo),
        (status = 404, description = "Discussion not found", body = ApiError)
    ),
    tag = "discussions"
)]
pub async fn resolve_discussion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResolveRequest>,
) -> Result<Json<DiscussionInfo>, ApiError> {
    let discussion_id = Uuid::from_str(&id).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "discussion id must be a valid UUID",
        )
    })?;

    let resolved = DiscussionRepository::new(&state.db)
        .resolve(discussion_id, &body.resolved_by)
        .await?;

    Ok(Json(DiscussionInfo::from(resolved)))
}

/// Request body for resolving a discussion
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub resolved_by: String,
}
