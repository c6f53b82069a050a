//! # Discussion Repository
//!
//! Threaded comments on a schedule. A root message opens a thread; replies
//! must reference a parent on the same schedule and inherit its thread id.

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::schedule_discussion::{
    ActiveModel, Column, ContextType, Entity as ScheduleDiscussion, Model,
};

/// Input for posting a discussion message.
#[derive(Debug, Clone)]
pub struct NewDiscussion {
    pub schedule_id: Uuid,
    pub parent_discussion_id: Option<Uuid>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub message: String,
    pub context_type: Option<ContextType>,
    pub context_id: Option<String>,
    pub mentions: Vec<String>,
    pub is_announcement: bool,
}

/// Repository for discussion database operations
pub struct DiscussionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DiscussionRepository<'a> {
    /// Create a new DiscussionRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Post a root message or a reply. Replies must reference a parent
    /// belonging to the same schedule and join its thread.
    pub async fn post(&self, input: NewDiscussion) -> Result<Model, ApiError> {
        let now = Utc::now().fixed_offset();
        let id = Uuid::new_v4();

        let thread_id = match input.parent_discussion_id {
            Some(parent_id) => {
                let parent = ScheduleDiscussion::find_by_id(parent_id)
                    .one(self.db)
                    .await?
                    .ok_or_else(|| {
                        ApiError::new(
                            StatusCode::NOT_FOUND,
                            "NOT_FOUND",
                            "Parent discussion not found",
                        )
                    })?;
                if parent.schedule_id != input.schedule_id {
                    return Err(ApiError::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "Parent discussion belongs to a different schedule",
                    ));
                }
                parent.thread_id.unwrap_or_else(|| thread_code(parent_id))
            }
            None => thread_code(id),
        };

        let mentions = if input.mentions.is_empty() {
            None
        } else {
            Some(JsonValue::from(input.mentions))
        };

        let message = ActiveModel {
            id: Set(id),
            schedule_id: Set(input.schedule_id),
            parent_discussion_id: Set(input.parent_discussion_id),
            thread_id: Set(Some(thread_id)),
            user_id: Set(input.user_id),
            user_name: Set(input.user_name),
            user_role: Set(input.user_role),
            message: Set(input.message),
            attachments: Set(None),
            context_type: Set(input.context_type.map(|c| c.as_str().to_string())),
            context_id: Set(input.context_id),
            context_data: Set(None),
            is_resolved: Set(false),
            resolved_by: Set(None),
            resolved_at: Set(None),
            mentions: Set(mentions),
            is_announcement: Set(input.is_announcement),
            is_pinned: Set(false),
            created_at: Set(now),
            edited_at: Set(None),
            metadata: Set(None),
        };

        Ok(message.insert(self.db).await?)
    }

    /// Mark a discussion as resolved
    pub async fn resolve(&self, id: Uuid, resolved_by: &str) -> Result<Model, ApiError> {
        let discussion = ScheduleDiscussion::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Discussion not found")
            })?;

        let mut active: ActiveModel = discussion.into();
        active.is_resolved = Set(true);
        active.resolved_by = Set(Some(resolved_by.to_string()));
        active.resolved_at = Set(Some(Utc::now().fixed_offset()));

        Ok(active.update(self.db).await?)
    }

    /// List all messages of one thread in posting order
    pub async fn list_thread(
        &self,
        schedule_id: Uuid,
        thread_id: &str,
    ) -> Result<Vec<Model>, ApiError> {
        Ok(ScheduleDiscussion::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .filter(Column::ThreadId.eq(thread_id))
            .order_by_asc(Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    /// List every discussion on a schedule, newest first
    pub async fn list_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Model>, ApiError> {
        Ok(ScheduleDiscussion::find()
            .filter(Column::ScheduleId.eq(schedule_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await?)
    }
}

fn thread_code(root_id: Uuid) -> String {
    format!("thr-{}", &root_id.simple().to_string()[..12])
}
