use chrono::Utc;

use crate::db::Database;
use crate::dto::{to_task_dto, TaskDto};
use crate::error::AppError;
use crate::models::{NewTask, Pagination, Task};

const TASK_COLUMNS: &str = "id, title, user_id, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persists a task after checking that its owner is a live user.
    pub async fn create_task(&self, task: NewTask) -> Result<Task, AppError> {
        let owner_exists = sqlx::query_as::<_, (i64,)>(
            "SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(&task.user_id)
        .fetch_optional(self.db.pool())
        .await?
        .is_some();
        if !owner_exists {
            return Err(AppError::NotFound("User not found".into()));
        }

        let now = Utc::now();
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.user_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        log::info!("Created task {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn get_task_by_id(&self, id: &str) -> Result<TaskDto, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND deleted_at IS NULL",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        Ok(to_task_dto(&task))
    }

    /// One page of live tasks, oldest first.
    pub async fn get_tasks(&self, page: Pagination) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE deleted_at IS NULL \
             ORDER BY created_at, id LIMIT $1 OFFSET $2",
            TASK_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.db.pool())
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PasswordHasher, TokenService};
    use crate::services::UserService;

    async fn setup() -> (TaskService, String) {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        let users = UserService::new(
            db.clone(),
            PasswordHasher::new(4),
            TokenService::new("task-service-secret"),
        );
        let owner = users
            .register_user("Owner".into(), "owner@x.com".into(), "secret123".into())
            .await
            .unwrap();
        (TaskService::new(db), owner.id)
    }

    #[actix_rt::test]
    async fn test_create_then_get_task() {
        let (tasks, owner_id) = setup().await;

        let created = tasks
            .create_task(NewTask::new("T", owner_id.clone()))
            .await
            .unwrap();
        assert_eq!(created.title, "T");
        assert!(created.deleted_at.is_none());

        let dto = tasks.get_task_by_id(&created.id).await.unwrap();
        assert_eq!(dto.id, created.id);
        assert_eq!(dto.title, "T");
        assert_eq!(dto.user_id, owner_id);
    }

    #[actix_rt::test]
    async fn test_create_task_requires_existing_owner() {
        let (tasks, _) = setup().await;
        let result = tasks.create_task(NewTask::new("T", "ghost")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_get_task_not_found() {
        let (tasks, _) = setup().await;
        assert!(matches!(
            tasks.get_task_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_get_tasks_is_paginated() {
        let (tasks, owner_id) = setup().await;
        for i in 0..3 {
            tasks
                .create_task(NewTask::new(format!("Task {}", i), owner_id.clone()))
                .await
                .unwrap();
        }

        assert_eq!(tasks.get_tasks(Pagination::default()).await.unwrap().len(), 3);
        assert_eq!(tasks.get_tasks(Pagination::new(2, 0)).await.unwrap().len(), 2);
        assert_eq!(tasks.get_tasks(Pagination::new(2, 2)).await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_soft_deleted_task_is_hidden() {
        let (tasks, owner_id) = setup().await;
        let created = tasks
            .create_task(NewTask::new("T", owner_id))
            .await
            .unwrap();

        sqlx::query("UPDATE tasks SET deleted_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(&created.id)
            .execute(tasks.db.pool())
            .await
            .unwrap();

        assert!(matches!(
            tasks.get_task_by_id(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(tasks.get_tasks(Pagination::default()).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_owner_with_tasks_cannot_be_hard_deleted() {
        let (tasks, owner_id) = setup().await;
        tasks
            .create_task(NewTask::new("T", owner_id.clone()))
            .await
            .unwrap();

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&owner_id)
            .execute(tasks.db.pool())
            .await;
        assert!(result.is_err());
    }
}
