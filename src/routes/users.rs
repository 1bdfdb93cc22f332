use crate::{
    auth::{AdminUser, AuthenticatedUser},
    error::AppError,
    models::{CreateUserRequest, Pagination},
    services::UserService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use validator::Validate;

/// Query parameters for `GET /api/users/{id}`.
///
/// Pagination fields are listed inline; `serde(flatten)` does not mix with
/// typed query values.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserQuery {
    /// Expand owned tasks into nested summaries instead of bare ids.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub expand: bool,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

/// Reads a query flag the way `strconv.ParseBool`-style clients send it.
///
/// `1`, `t`, `T`, `true`, `TRUE` and `True` mean true. Anything else, a bare
/// `?expand` included, means false.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(matches!(
        value.as_str(),
        "1" | "t" | "T" | "true" | "TRUE" | "True"
    ))
}

impl UserQuery {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Creates a user with an explicit role.
///
/// ## Responses:
/// - `201 Created`: `{ "user": UserDto }`.
/// - `400 Bad Request`: malformed body or email already registered.
/// - `403 Forbidden`: caller is not an admin.
/// - `422 Unprocessable Entity`: validation failed.
#[post("")]
pub async fn create_user(
    _admin: AdminUser,
    users: web::Data<UserService>,
    user_data: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let user = users.create_user(user_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({ "user": user })))
}

/// Retrieves a user and one page of their tasks.
///
/// Callers may read their own record; admins may read any.
///
/// ## Query Parameters:
/// - `expand` (optional, default `false`): nest task summaries instead of ids.
/// - `limit` (optional, 1..=100, default 20) and `offset` (optional, default 0).
///
/// ## Responses:
/// - `200 OK`: the `UserDto`.
/// - `403 Forbidden`: another user's record, caller not an admin.
/// - `404 Not Found`: no live user with that id.
#[get("/{id}")]
pub async fn get_user(
    caller: AuthenticatedUser,
    users: web::Data<UserService>,
    user_id: web::Path<String>,
    query: web::Query<UserQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;
    let user_id = user_id.into_inner();
    caller.ensure_self_or_admin(&user_id)?;

    let user = users
        .get_user_by_id(&user_id, query.expand, query.page())
        .await?;

    Ok(HttpResponse::Ok().json(user))
}
