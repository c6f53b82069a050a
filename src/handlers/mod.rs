//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Scheduling API.

use crate::models::ServiceInfo;
use axum::response::Json;

pub mod approvals;
pub mod discussions;
pub mod optimize;
pub mod schedules;
pub mod snapshots;
pub mod subscriptions;
pub mod types;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

#[cfg(test)]
mod tests;
