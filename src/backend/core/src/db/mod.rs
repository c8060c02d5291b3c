//! Database layer for Eventify.
//!
//! Uses PostgreSQL for persistent storage with sqlx. [`Database`] implements
//! the user, RBAC and event store traits, so the rest of the crate never sees
//! SQL.

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::rbac::{StoreError, StoreResult};

mod events;
mod rbac;
mod users;

/// Database connection and operations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn new(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::from(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip to the server, for health checks.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ═══════════════════════════════════════════════════════════════════════════════

/// Postgres SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "record",
                id: String::new(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                    let entity = match db_err.constraint() {
                        Some(c) if c.contains("role_id") => "role",
                        Some(c) if c.contains("permission_id") => "permission",
                        Some(c) if c.contains("user_id") => "user",
                        _ => "record",
                    };
                    return StoreError::NotFound {
                        entity,
                        id: db_err.message().to_string(),
                    };
                }
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("unique") || constraint.contains("pkey") {
                        return StoreError::Duplicate {
                            entity: entity_for_constraint(constraint),
                            key: constraint.to_string(),
                        };
                    }
                }
                StoreError::Internal(error.to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(error.to_string())
            }
            _ => StoreError::Internal(error.to_string()),
        }
    }
}

fn entity_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        c if c.starts_with("users_") => "user",
        c if c.starts_with("roles_") => "role",
        c if c.starts_with("permissions_") => "permission",
        c if c.starts_with("user_roles_") => "user role",
        c if c.starts_with("role_permissions_") => "role permission",
        _ => "record",
    }
}
