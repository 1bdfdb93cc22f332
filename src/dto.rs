//! Client-facing response shapes.
//!
//! Entities from [`crate::models`] are projected here before they leave a
//! service. The user projection has no password field at all.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::{Role, Task, User};

/// Abbreviated task nested inside an expanded [`UserDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub user_id: String,
}

/// A user's task, either as a bare id or expanded into a [`TaskSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Id(String),
    Expanded(TaskSummary),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub tasks: Vec<TaskRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: String,
    pub title: String,
    pub user_id: String,
    /// Creation time in the server's local time zone.
    pub created_at: DateTime<Local>,
}

/// Projects a user and the given slice of their tasks.
///
/// With `expand` each task becomes a [`TaskSummary`]; otherwise only its id is kept.
pub fn to_user_dto(user: &User, tasks: &[Task], expand: bool) -> UserDto {
    let tasks = tasks
        .iter()
        .map(|task| {
            if expand {
                TaskRef::Expanded(TaskSummary {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    user_id: task.user_id.clone(),
                })
            } else {
                TaskRef::Id(task.id.clone())
            }
        })
        .collect();

    UserDto {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        tasks,
    }
}

pub fn to_task_dto(task: &Task) -> TaskDto {
    TaskDto {
        id: task.id.clone(),
        title: task.title.clone(),
        user_id: task.user_id.clone(),
        created_at: task.created_at.with_timezone(&Local),
    }
}
