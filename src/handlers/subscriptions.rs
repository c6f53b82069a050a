//! # Subscription Endpoint Handlers
//!
//! Per-user notification preferences for a schedule.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::schedules::parse_schedule_id;
use crate::models::schedule_subscription::Model as SubscriptionModel;
use crate::repositories::{SubscriptionPreferences, SubscriptionRepository};
use crate::server::AppState;

/// Subscription information for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub id: String,
    pub user_id: String,
    pub notify_on_changes: bool,
    pub notify_on_approval: bool,
    pub notify_on_publish: bool,
    pub notify_on_discussion: bool,
    pub email_notifications: bool,
    pub in_app_notifications: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_frequency: Option<String>,
    pub subscribed_at: String,
}

impl From<SubscriptionModel> for SubscriptionInfo {
    fn from(model: SubscriptionModel) -> Self {
        Self {
            id: model.id.to_string(),
            user_id: model.user_id,
            notify_on_changes: model.notify_on_changes,
            notify_on_approval: model.notify_on_approval,
            notify_on_publish: model.notify_on_publish,
            notify_on_discussion: model.notify_on_discussion,
            email_notifications: model.email_notifications,
            in_app_notifications: model.in_app_notifications,
            digest_frequency: model.digest_frequency,
            subscribed_at: model.subscribed_at.to_rfc3339(),
        }
    }
}

/// Request body for subscribing to a schedule
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: String,
    pub notify_on_changes: Option<bool>,
    pub notify_on_approval: Option<bool>,
    pub notify_on_publish: Option<bool>,
    pub notify_on_discussion: Option<bool>,
    pub email_notifications: Option<bool>,
    pub in_app_notifications: Option<bool>,
    /// immediate, hourly, or daily
    pub digest_frequency: Option<String>,
}

/// Subscribe a user to schedule notifications (idempotent per user)
#[utoipa::path(
    post,
    path = "/schedules/{id}/subscriptions",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription created or updated", body = SubscriptionInfo)
    ),
    tag = "subscriptions"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionInfo>), ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let defaults = SubscriptionPreferences::default();
    let preferences = SubscriptionPreferences {
        notify_on_changes: body.notify_on_changes.unwrap_or(defaults.notify_on_changes),
        notify_on_approval: body.notify_on_approval.unwrap_or(defaults.notify_on_approval),
        notify_on_publish: body.notify_on_publish.unwrap_or(defaults.notify_on_publish),
        notify_on_discussion: body
            .notify_on_discussion
            .unwrap_or(defaults.notify_on_discussion),
        email_notifications: body
            .email_notifications
            .unwrap_or(defaults.email_notifications),
        in_app_notifications: body
            .in_app_notifications
            .unwrap_or(defaults.in_app_notifications),
        digest_frequency: body.digest_frequency,
    };

    let subscription = SubscriptionRepository::new(&state.db)
        .subscribe(schedule_id, &body.user_id, preferences)
        .await?;

    Ok((StatusCode::CREATED, Json(SubscriptionInfo::from(subscription))))
}

/// List the subscriptions on a schedule
#[utoipa::path(
    get,
    path = "/schedules/{id}/subscriptions",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Subscriptions listed", body = [SubscriptionInfo])
    ),
    tag = "subscriptions"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SubscriptionInfo>>, ApiError> {
    let schedule_id = parse_schedule_id(&id)?;

    let subscriptions = SubscriptionRepository::new(&state.db)
        .list_for_schedule(schedule_id)
        .await?;

    Ok(Json(
        subscriptions.into_iter().map(SubscriptionInfo::from).collect(),
    ))
}
