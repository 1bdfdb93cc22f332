pub mod pagination;
pub mod task;
pub mod user;

pub use pagination::Pagination;
pub use task::{NewTask, Task, TaskInput};
pub use user::{CreateUserRequest, NewUser, Role, User};
