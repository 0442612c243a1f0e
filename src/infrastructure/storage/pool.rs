//! SQLite connection pool

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Whether a URL points at a private in-memory database
pub fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open a pool for the configured database.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never reaped.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::storage(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let pool = if is_in_memory_url(&config.url) {
        single_connection_pool(options).await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open database: {}", e)))?
    };

    info!(url = %config.url, "Database pool ready");

    Ok(pool)
}

/// Open a fresh, private in-memory database
pub async fn connect_in_memory() -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DomainError::storage(format!("Invalid database URL: {}", e)))?;

    single_connection_pool(options).await
}

async fn single_connection_pool(options: SqliteConnectOptions) -> Result<SqlitePool, DomainError> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to open in-memory database: {}", e)))
}
