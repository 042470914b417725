//! Database module for handling PostgreSQL connections and operations
//!
//! This module provides connection pooling, configuration, and health checks
//! for the PostgreSQL database.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Pool, Postgres, postgres::PgPoolOptions};
use std::env;
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: full connection URL, takes precedence when set
    /// - `DB_HOST`: database host (default: "localhost")
    /// - `DB_PORT`: database port (default: 5432)
    /// - `DB_USER`: database user (default: "admin")
    /// - `DB_PASSWORD`: database password (default: "admin123")
    /// - `DB_NAME`: database name (default: "proyectofinal")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
                let user = env::var("DB_USER").unwrap_or_else(|_| "admin".to_string());
                let password = env::var("DB_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
                let name = env::var("DB_NAME").unwrap_or_else(|_| "proyectofinal".to_string());
                let port: u16 = match env::var("DB_PORT") {
                    Ok(raw) => raw.parse().map_err(|_| {
                        DatabaseError::Configuration(format!("Invalid DB_PORT: {}", raw))
                    })?,
                    Err(_) => 5432,
                };

                format!(
                    "postgresql://{}:{}@{}:{}/{}",
                    user, password, host, port, name
                )
            }
        };

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Initialize a PostgreSQL connection pool
///
/// Connections are checked out per statement and returned to the pool when
/// the statement completes, whether it succeeded or not.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<Pool<Postgres>>` - PostgreSQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<Pool<Postgres>> {
    info!("Initializing database connection pool");

    let options = config
        .database_url
        .parse()
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - PostgreSQL connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if connection is successful
pub async fn health_check(pool: &PgPool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| {
            error!("Database health check failed: {}", e);
            DatabaseError::Query(e)
        })?;

    Ok(true)
}
