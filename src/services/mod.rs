//! Orchestration between the HTTP layer, the credential/token modules and the database.

pub mod task;
pub mod user;

pub use task::TaskService;
pub use user::UserService;

use crate::error::AppError;

/// Runs CPU-heavy work (bcrypt) off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Blocking task failed: {}", e)))?
}
