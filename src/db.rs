//! Database connection pool, schema migrations and the health snapshot.

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Timeout applied to the liveness ping in [`Database::health`].
const HEALTH_TIMEOUT: Duration = Duration::from_secs(1);

/// Share of `max_connections` in use above which the pool is reported as under heavy load.
const HEAVY_LOAD_RATIO: f64 = 0.8;

/// Handle over the pooled SQLite connection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    max_connections: u32,
}

/// Snapshot returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatabaseHealth {
    /// `"up"` or `"down"`.
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub open_connections: u32,
    pub idle: u32,
    pub in_use: u32,
    pub max_connections: u32,
}

impl DatabaseHealth {
    pub fn is_up(&self) -> bool {
        self.status == "up"
    }
}

impl Database {
    /// Opens the pool (creating the database file if needed) and applies migrations.
    ///
    /// In-memory databases live only as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let max_connections = if in_memory { 1 } else { max_connections.max(1) };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30));
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        log::info!(
            "Connecting to database (max_connections = {})",
            max_connections
        );
        let pool = pool_options.connect_with(options).await?;

        let db = Self {
            pool,
            max_connections,
        };
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        log::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Pings the database and reports pool statistics. Never fails; an
    /// unreachable database is reported as `"down"`.
    pub async fn health(&self) -> DatabaseHealth {
        let ping = tokio::time::timeout(
            HEALTH_TIMEOUT,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await;

        let open_connections = self.pool.size();
        let idle = u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX);
        let in_use = open_connections.saturating_sub(idle);

        let (status, message, error) = match ping {
            Ok(Ok(_)) => {
                let heavy =
                    f64::from(in_use) > f64::from(self.max_connections) * HEAVY_LOAD_RATIO;
                let message = if heavy {
                    "The database is experiencing heavy load."
                } else {
                    "It's healthy"
                };
                ("up", message.to_string(), None)
            }
            Ok(Err(e)) => {
                log::error!("Database health check failed: {}", e);
                ("down", "db down".to_string(), Some(e.to_string()))
            }
            Err(_) => {
                log::error!("Database health check timed out");
                (
                    "down",
                    "db down".to_string(),
                    Some(format!("ping timed out after {:?}", HEALTH_TIMEOUT)),
                )
            }
        };

        DatabaseHealth {
            status: status.to_string(),
            message,
            error,
            open_connections,
            idle,
            in_use,
            max_connections: self.max_connections,
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        log::info!("Disconnected from database");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_connect_runs_migrations() {
        let db = Database::connect("sqlite::memory:", 10).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec![("tasks".to_string(),), ("users".to_string(),)]
        );
    }

    #[actix_rt::test]
    async fn test_health_up_and_down() {
        let db = Database::connect("sqlite::memory:", 10).await.unwrap();

        let health = db.health().await;
        assert!(health.is_up());
        assert_eq!(health.max_connections, 1);
        assert!(health.error.is_none());

        db.close().await;
        let health = db.health().await;
        assert_eq!(health.status, "down");
        assert!(health.error.is_some());
    }
}
