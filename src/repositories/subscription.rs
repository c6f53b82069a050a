//! # Subscription Repository
//!
//! Per-user notification preferences for a schedule. The unique constraint
//! on (schedule_id, user_id) makes subscribe idempotent under races: the
//! slower writer gets a conflict instead of a duplicate row.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule_subscription::{
    ActiveModel, Column, Entity as ScheduleSubscription, Model,
};

/// Notification preferences for one subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionPreferences {
    pub notify_on_changes: bool,
    pub notify_on_approval: bool,
    pub notify_on_publish: bool,
    pub notify_on_discussion: bool,
    pub email_notifications: bool,
    pub in_app_notifications: bool,
    pub digest_frequency: Option<String>,
}

impl Default for SubscriptionPreferences {
    fn default() -> Self {
        Self {
            notify_on_changes: true,
            notify_on_approval: true,
            notify_on_publish: true,
            notify_on_discussion: false,
            email_notifications: true,
            in_app_notifications: true,
            digest_frequency: None,
        }
    }
}

/// Repository for subscription database operations
pub struct SubscriptionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new SubscriptionRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Subscribe a user to a schedule, updating preferences when the
    /// subscription already exists.
    pub async fn subscribe(
        &self,
        schedule_id: Uuid,
        user_id: &str,
        preferences: SubscriptionPreferences,
    ) -> Result<Model, ApiError> {
        let existing = ScheduleSubscription::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .filter(Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        if let Some(subscription) = existing {
            let mut active: ActiveModel = subscription.into();
            active.notify_on_changes = Set(preferences.notify_on_changes);
            active.notify_on_approval = Set(preferences.notify_on_approval);
            active.notify_on_publish = Set(preferences.notify_on_publish);
            active.notify_on_discussion = Set(preferences.notify_on_discussion);
            active.email_notifications = Set(preferences.email_notifications);
            active.in_app_notifications = Set(preferences.in_app_notifications);
            active.digest_frequency = Set(preferences.digest_frequency);
            return Ok(active.update(self.db).await?);
        }

        let subscription = ActiveModel {
            id: Set(Uuid::new_v4()),
            schedule_id: Set(schedule_id),
            user_id: Set(user_id.to_string()),
            notify_on_changes: Set(preferences.notify_on_changes),
            notify_on_approval: Set(preferences.notify_on_approval),
            notify_on_publish: Set(preferences.notify_on_publish),
            notify_on_discussion: Set(preferences.notify_on_discussion),
            email_notifications: Set(preferences.email_notifications),
            in_app_notifications: Set(preferences.in_app_notifications),
            digest_frequency: Set(preferences.digest_frequency),
            subscribed_at: Set(Utc::now().fixed_offset()),
            last_notified_at: Set(None),
            metadata: Set(None),
        };

        // A concurrent subscribe for the same (schedule, user) loses the
        // insert race and surfaces as a 409 through the unique constraint.
        Ok(subscription.insert(self.db).await?)
    }

    /// List subscriptions for a schedule
    pub async fn list_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Model>, ApiError> {
        Ok(ScheduleSubscription::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .all(self.db)
            .await?)
    }

    /// Remove a user's subscription
    pub async fn unsubscribe(&self, schedule_id: Uuid, user_id: &str) -> Result<(), ApiError> {
        ScheduleSubscription::delete_many()
            .filter(Column::ScheduleId.eq(schedule_id))
            .filter(Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
