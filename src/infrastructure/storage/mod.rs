//! Storage infrastructure: connection pool and schema migrations

pub mod migrations;
mod pool;

pub use migrations::{run_schema_migrations, schema_migrations, Migration, Migrator, SqliteMigrator};
pub use pool::{connect, connect_in_memory, is_in_memory_url};

/// Fresh in-memory database with the full schema applied
#[cfg(test)]
pub(crate) async fn migrated_test_pool() -> sqlx::SqlitePool {
    let pool = connect_in_memory().await.expect("in-memory database");
    run_schema_migrations(&pool).await.expect("schema migrations");
    pool
}
