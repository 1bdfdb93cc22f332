use crate::{
    auth::AuthenticatedUser,
    dto::{to_task_dto, TaskDto},
    error::AppError,
    models::{NewTask, Pagination, TaskInput},
    services::TaskService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Lists tasks, one page at a time.
///
/// ## Query Parameters:
/// - `limit` (optional, 1..=100, default 20).
/// - `offset` (optional, default 0).
///
/// ## Responses:
/// - `200 OK`: `{ "tasks": [TaskDto], "limit": n, "offset": n }`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: pagination out of range.
#[get("")]
pub async fn get_tasks(
    _caller: AuthenticatedUser,
    tasks: web::Data<TaskService>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let page = page.into_inner();

    let items: Vec<TaskDto> = tasks
        .get_tasks(page)
        .await?
        .iter()
        .map(to_task_dto)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "tasks": items,
        "limit": page.limit(),
        "offset": page.offset(),
    })))
}

/// Creates a task.
///
/// The owner defaults to the authenticated user. Naming another owner through
/// `user_id` requires the admin role.
///
/// ## Responses:
/// - `201 Created`: `{ "task": TaskDto }`.
/// - `403 Forbidden`: `user_id` names someone else and the caller is not an admin.
/// - `404 Not Found`: the owner does not exist.
/// - `422 Unprocessable Entity`: title empty or longer than 200 characters.
#[post("")]
pub async fn create_task(
    caller: AuthenticatedUser,
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let TaskInput { title, user_id } = task_data.into_inner();
    let owner_id = user_id.unwrap_or_else(|| caller.id.clone());
    caller.ensure_self_or_admin(&owner_id)?;

    let task = tasks.create_task(NewTask::new(title, owner_id)).await?;

    Ok(HttpResponse::Created().json(json!({ "task": to_task_dto(&task) })))
}

/// Retrieves a specific task by its id.
///
/// ## Responses:
/// - `200 OK`: `{ "task": TaskDto }`.
/// - `404 Not Found`: no live task with that id.
#[get("/{id}")]
pub async fn get_task(
    _caller: AuthenticatedUser,
    tasks: web::Data<TaskService>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task_by_id(&task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}
