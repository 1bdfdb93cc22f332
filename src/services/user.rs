use chrono::Utc;

use crate::auth::{AuthResponse, PasswordHasher, TokenService};
use crate::config::AdminSeed;
use crate::db::Database;
use crate::dto::{to_user_dto, UserDto};
use crate::error::AppError;
use crate::models::{CreateUserRequest, NewUser, Pagination, Role, Task, User};
use crate::services::run_blocking;
use validator::Validate;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, created_at, updated_at, deleted_at";

/// User persistence plus the register/login flows.
#[derive(Clone)]
pub struct UserService {
    db: Database,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl UserService {
    pub fn new(db: Database, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self { db, hasher, tokens }
    }

    /// Creates a user with the requested role and returns its non-expanded projection.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserDto, AppError> {
        let new_user = self
            .build_user(request.name, request.email, request.password, request.role)
            .await?;
        let user = self.insert(&new_user).await?;
        log::info!("Created user {} with role {:?}", user.id, user.role);
        Ok(to_user_dto(&user, &[], false))
    }

    /// Loads a live user and one page of their tasks.
    pub async fn get_user_by_id(
        &self,
        id: &str,
        expand: bool,
        page: Pagination,
    ) -> Result<UserDto, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, user_id, created_at, updated_at, deleted_at FROM tasks \
             WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at, id LIMIT $2 OFFSET $3",
        )
        .bind(&user.id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.db.pool())
        .await?;

        Ok(to_user_dto(&user, &tasks, expand))
    }

    /// Creates the bootstrap admin unless an account with that email already exists.
    ///
    /// Returns whether a user was created. Existing accounts are left untouched.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<bool, AppError> {
        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&seed.email)
            .fetch_optional(self.db.pool())
            .await?;
        if existing.is_some() {
            log::info!("Admin account {} already exists", seed.email);
            return Ok(false);
        }

        let request = CreateUserRequest {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password: seed.password.clone(),
            role: Role::Admin,
        };
        request.validate()?;

        let admin = self.create_user(request).await?;
        log::info!("Seeded admin account {}", admin.id);
        Ok(true)
    }

    /// Registers a self-service account with [`Role::User`].
    ///
    /// Returns the stored entity, hash included; callers project it before responding.
    pub async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, AppError> {
        let new_user = self.build_user(name, email, password, Role::User).await?;
        let user = self.insert(&new_user).await?;
        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and issues a bearer token.
    ///
    /// Fails with `NotFound` for an unknown email and `Unauthorized` for a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let hasher = self.hasher;
        let password_hash = user.password_hash.clone();
        let password = password.to_string();
        run_blocking(move || Ok(hasher.verify(&password_hash, &password)?)).await?;

        let token = self
            .tokens
            .issue(&user.id, &user.email, &user.name, user.role)?;
        log::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user_id: user.id,
        })
    }

    async fn build_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<NewUser, AppError> {
        let hasher = self.hasher;
        run_blocking(move || Ok(NewUser::new(&name, &email, &password, role, &hasher)?)).await
    }

    async fn insert(&self, new_user: &NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(new_user.id())
        .bind(new_user.name())
        .bind(new_user.email())
        .bind(new_user.password_hash())
        .bind(new_user.role())
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;
        Ok(user)
    }
}
