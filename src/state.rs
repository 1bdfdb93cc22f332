use actix_web::web;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::services::{TaskService, UserService};

/// Components built once at startup and shared with every worker.
///
/// Each one is registered as its own `web::Data`, so handlers and the auth
/// middleware ask only for what they use.
#[derive(Clone)]
pub struct AppState {
    pub db: web::Data<Database>,
    pub tokens: web::Data<TokenService>,
    pub users: web::Data<UserService>,
    pub tasks: web::Data<TaskService>,
}

impl AppState {
    pub fn new(db: Database, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users: web::Data::new(UserService::new(db.clone(), hasher, tokens.clone())),
            tasks: web::Data::new(TaskService::new(db.clone())),
            tokens: web::Data::new(tokens),
            db: web::Data::new(db),
        }
    }

    /// Connects to the configured database, wires every service and seeds the
    /// bootstrap admin when one is configured.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let db = Database::connect(&config.database_url, config.database_max_connections).await?;
        let state = Self::new(
            db,
            PasswordHasher::new(config.bcrypt_cost),
            TokenService::new(&config.jwt_secret),
        );

        if let Some(seed) = &config.admin {
            state.users.ensure_admin(seed).await?;
        }
        Ok(state)
    }

    /// Registers the shared components and the extractor error handlers.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db.clone())
            .app_data(self.tokens.clone())
            .app_data(self.users.clone())
            .app_data(self.tasks.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                bad_request(format!("Invalid request body: {}", err))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                bad_request(format!("Invalid query string: {}", err))
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                bad_request(format!("Invalid path: {}", err))
            }));
    }
}

fn bad_request(message: String) -> actix_web::Error {
    AppError::BadRequest(message).into()
}
