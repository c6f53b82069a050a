//! # Data Models
//!
//! This module contains all the data models used throughout the Scheduling API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod schedule;
pub mod schedule_approval;
pub mod schedule_assignment;
pub mod schedule_comparison;
pub mod schedule_discussion;
pub mod schedule_snapshot;
pub mod schedule_subscription;

pub use schedule::Entity as Schedule;
pub use schedule_approval::Entity as ScheduleApproval;
pub use schedule_assignment::Entity as ScheduleAssignment;
pub use schedule_comparison::Entity as ScheduleComparison;
pub use schedule_discussion::Entity as ScheduleDiscussion;
pub use schedule_snapshot::Entity as ScheduleSnapshot;
pub use schedule_subscription::Entity as ScheduleSubscription;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "scheduling-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
