//! # Repositories
//!
//! This module contains the repository implementations that encapsulate all
//! SeaORM access to the schedule store. Write paths that span several rows
//! run inside transactions; uniqueness races are resolved by the database
//! constraints rather than application locks.

pub mod approval;
pub mod comparison;
pub mod discussion;
pub mod schedule;
pub mod snapshot;
pub mod subscription;

pub use approval::ApprovalRepository;
pub use comparison::ComparisonRepository;
pub use discussion::DiscussionRepository;
pub use schedule::{NewAssignment, NewScheduleVersion, ScheduleRepository};
pub use snapshot::SnapshotRepository;
pub use subscription::{SubscriptionPreferences, SubscriptionRepository};
