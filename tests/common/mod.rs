//! Shared setup for the integration tests: an in-memory database, the full
//! service graph, and helpers that register and log in users over HTTP.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test};
use serde_json::{json, Value};

use taskdesk::auth::{AuthResponse, PasswordHasher, TokenService};
use taskdesk::db::Database;
use taskdesk::models::{CreateUserRequest, Role};
use taskdesk::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Authenticated identity handed back by the helpers below.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Fresh state over its own in-memory database; bcrypt runs at minimum cost.
pub async fn test_state() -> AppState {
    let db = Database::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    AppState::new(db, PasswordHasher::new(4), TokenService::new(TEST_SECRET))
}

/// Builds the same app `main` serves, minus CORS.
macro_rules! test_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::Logger::default())
                .configure(move |cfg| state.register(cfg))
                .configure(taskdesk::routes::config),
        )
        .await
    }};
}

pub async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Failed to register {}. Status: {}. Body: {}",
        email,
        status,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse registration response")
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Failed to log in {}. Status: {}. Body: {}",
        email,
        status,
        String::from_utf8_lossy(&body)
    );
    let auth: AuthResponse =
        serde_json::from_slice(&body).expect("Failed to parse login response");
    TestUser {
        id: auth.user_id,
        token: auth.token,
    }
}

pub async fn register_and_login<S, B>(app: &S, name: &str, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    register(app, name, email, "Password123!").await;
    login(app, email, "Password123!").await
}

/// Admins cannot self-register, so they are seeded through the service.
pub async fn seed_admin<S, B>(state: &AppState, app: &S, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    state
        .users
        .create_user(CreateUserRequest {
            name: "Admin".into(),
            email: email.into(),
            password: "AdminPassword1!".into(),
            role: Role::Admin,
        })
        .await
        .expect("Failed to seed admin");
    login(app, email, "AdminPassword1!").await
}
