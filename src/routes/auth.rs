use crate::{
    auth::{LoginRequest, RegisterRequest},
    dto::to_user_dto,
    error::AppError,
    services::UserService,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates a self-service account with the `user` role and returns its projection.
/// A duplicate email is answered with 400.
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let RegisterRequest {
        name,
        email,
        password,
    } = register_data.into_inner();
    let user = users.register_user(name, email, password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "user": to_user_dto(&user, &[], false)
    })))
}

/// Login user
///
/// Authenticates a user and returns a bearer token. Unknown emails and wrong
/// passwords get the same 401 answer.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    match users.login(&login_data.email, &login_data.password).await {
        Ok(auth) => Ok(HttpResponse::Ok().json(auth)),
        Err(AppError::NotFound(_)) => Err(AppError::Unauthorized("Invalid credentials".into())),
        Err(e) => Err(e),
    }
}
