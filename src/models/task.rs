use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Owner of the task. Defaults to the authenticated caller; only admins
    /// may create tasks for someone else.
    pub user_id: Option<String>,
}

/// Represents a task entity as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4 string).
    pub id: String,
    pub title: String,
    /// Identifier of the user who owns the task.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the task is soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A task ready to be inserted, with its id already generated.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: String,
    pub title: String,
    pub user_id: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            user_id: user_id.into(),
        }
    }
}
