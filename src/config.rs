use std::env;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Account created at startup with the admin role when its email is not taken yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://taskdesk.db".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parse_var("PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            bcrypt_cost,
            admin: admin_seed()?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// `ADMIN_EMAIL` and `ADMIN_PASSWORD` go together; `ADMIN_NAME` defaults to "Admin".
fn admin_seed() -> Result<Option<AdminSeed>, ConfigError> {
    let email = non_empty_var("ADMIN_EMAIL");
    let password = non_empty_var("ADMIN_PASSWORD");

    match (email, password) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Missing("ADMIN_PASSWORD")),
        (None, Some(_)) => Err(ConfigError::Missing("ADMIN_EMAIL")),
        (Some(email), Some(password)) => Ok(Some(AdminSeed {
            name: non_empty_var("ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
            email,
            password,
        })),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
