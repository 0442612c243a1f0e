//! SQLite user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

/// SQLite implementation of UserRepository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                DomainError::conflict(format!("Email '{}' is already registered", user.email))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(User::from_new(
            UserId::new(result.last_insert_rowid()),
            user,
            created_at,
        ))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed user row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let username: String = row.try_get("username").map_err(map_err)?;
    let email: String = row.try_get("email").map_err(map_err)?;
    let password_hash: String = row.try_get("password_hash").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;

    Ok(User::new(
        UserId::new(id),
        username,
        email,
        password_hash,
        created_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::migrated_test_pool;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "testuser".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteUserRepository::new(migrated_test_pool().await);

        let created = repo.create(new_user("test@test.com")).await.unwrap();
        assert!(created.id().value() > 0);

        let by_id = repo.get(created.id()).await.unwrap().unwrap();
        assert_eq!(by_id.email(), "test@test.com");
        assert_eq!(by_id.password_hash(), "$argon2id$stub");

        let by_email = repo.get_by_email("test@test.com").await.unwrap().unwrap();
        assert_eq!(by_email.id(), created.id());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = SqliteUserRepository::new(migrated_test_pool().await);

        repo.create(new_user("dup@test.com")).await.unwrap();
        let err = repo.create(new_user("dup@test.com")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let repo = SqliteUserRepository::new(migrated_test_pool().await);

        assert!(repo.get(UserId::new(99)).await.unwrap().is_none());
        assert!(!repo.email_exists("nobody@test.com").await.unwrap());
    }
}
