//! Database migrations
//!
//! The schema is a fixed, ordered list of migrations. Each one is applied in
//! its own transaction together with its bookkeeping row, so a failed
//! migration leaves no trace.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last applied migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Reverts every applied migration, newest first
    async fn revert_all(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// SQLite migrator over the built-in schema
#[derive(Debug)]
pub struct SqliteMigrator {
    pool: SqlitePool,
    migrations: Vec<Migration>,
}

impl SqliteMigrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            migrations: schema_migrations(),
        }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = ?)")
                .bind(version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        Ok(applied)
    }

    /// Runs a single migration
    pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin migration: {}", e)))?;

        sqlx::query(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, "Applied migration: {}", migration.description);

        Ok(())
    }

    /// Reverts a single migration
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin revert: {}", e)))?;

        sqlx::query(migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = ?")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        info!(version = migration.version, "Reverted migration: {}", migration.description);

        Ok(())
    }

    /// Returns all applied migration versions
    pub async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let versions: Vec<i64> =
            sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get applied migrations: {}", e))
                })?;

        Ok(versions)
    }
}

#[async_trait]
impl Migrator for SqliteMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        for migration in &self.migrations {
            self.run_migration(migration).await?;
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(current) = self.version().await? else {
            return Ok(());
        };

        match self.migrations.iter().find(|m| m.version == current) {
            Some(migration) => self.revert_migration(migration).await,
            None => Err(DomainError::storage(format!(
                "Applied migration {} is unknown to this build",
                current
            ))),
        }
    }

    async fn revert_all(&self) -> Result<(), DomainError> {
        for migration in self.migrations.iter().rev() {
            self.revert_migration(migration).await?;
        }

        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))?;

        Ok(version)
    }
}

/// Represents a database migration. Each side holds exactly one statement.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

impl Migration {
    pub const fn new(
        version: i64,
        description: &'static str,
        up: &'static str,
        down: &'static str,
    ) -> Self {
        Self {
            version,
            description,
            up,
            down,
        }
    }
}

/// The application schema, in order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            "DROP TABLE IF EXISTS users",
        ),
        Migration::new(
            2,
            "Create register table",
            r#"
            CREATE TABLE IF NOT EXISTS register (
                rid INTEGER PRIMARY KEY AUTOINCREMENT,
                farmer_name TEXT NOT NULL,
                adhar_number TEXT NOT NULL,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                address TEXT NOT NULL,
                farming TEXT NOT NULL
            )
            "#,
            "DROP TABLE IF EXISTS register",
        ),
        Migration::new(
            3,
            "Create farming table",
            r#"
            CREATE TABLE IF NOT EXISTS farming (
                fid INTEGER PRIMARY KEY AUTOINCREMENT,
                farming_type TEXT NOT NULL UNIQUE
            )
            "#,
            "DROP TABLE IF EXISTS farming",
        ),
        Migration::new(
            4,
            "Create agro products table",
            r#"
            CREATE TABLE IF NOT EXISTS agro_products (
                pid INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                product_name TEXT NOT NULL,
                product_desc TEXT NOT NULL,
                price INTEGER NOT NULL
            )
            "#,
            "DROP TABLE IF EXISTS agro_products",
        ),
        Migration::new(
            5,
            "Create farmer audit table",
            r#"
            CREATE TABLE IF NOT EXISTS farmer_audit (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rid INTEGER NOT NULL,
                action TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            "DROP TABLE IF EXISTS farmer_audit",
        ),
        Migration::new(
            6,
            "Create sessions table",
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                flash TEXT,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            "#,
            "DROP TABLE IF EXISTS sessions",
        ),
        Migration::new(
            7,
            "Index sessions by expiry",
            "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
            "DROP INDEX IF EXISTS idx_sessions_expires_at",
        ),
    ]
}

/// Applies every pending migration
pub async fn run_schema_migrations(pool: &SqlitePool) -> Result<(), DomainError> {
    SqliteMigrator::new(pool.clone()).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::connect_in_memory;

    async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert!(!migrations.is_empty());

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations must be in ascending order"
            );
        }
    }

    #[tokio::test]
    async fn test_run_creates_all_tables() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::new(pool.clone());

        migrator.run().await.unwrap();

        for table in ["users", "register", "farming", "agro_products", "farmer_audit", "sessions"] {
            assert!(table_exists(&pool, table).await, "missing table {}", table);
        }
        assert_eq!(migrator.version().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::new(pool);

        migrator.run().await.unwrap();
        migrator.run().await.unwrap();

        assert_eq!(migrator.applied_versions().await.unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_revert_drops_latest_only() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::new(pool.clone());

        migrator.run().await.unwrap();
        migrator.revert().await.unwrap();

        assert_eq!(migrator.version().await.unwrap(), Some(6));
        assert!(table_exists(&pool, "sessions").await);
    }

    #[tokio::test]
    async fn test_revert_all_tears_down_schema() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::new(pool.clone());

        migrator.run().await.unwrap();
        migrator.revert_all().await.unwrap();

        assert!(!table_exists(&pool, "users").await);
        assert!(!table_exists(&pool, "register").await);
        assert_eq!(migrator.version().await.unwrap(), None);
    }
}
