//! Session storage and service
//!
//! Sessions are rows keyed by a random token. The cookie carries only the
//! token; flash messages ride along on the row until read.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::domain::session::{Session, SessionRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Length of a session token
pub const TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, flash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.token())
        .bind(session.user_id().value())
        .bind(session.flash())
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        Ok(session)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            "SELECT token, user_id, flash, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get session: {}", e)))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_flash(&self, token: &str, message: Option<String>) -> Result<(), DomainError> {
        sqlx::query("UPDATE sessions SET flash = ? WHERE token = ?")
            .bind(message)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set flash message: {}", e)))?;

        Ok(())
    }

    /// Read, then clear only if the message is still the one read. Both
    /// statements autocommit, so no read lock is ever upgraded to a write lock.
    async fn take_flash(&self, token: &str) -> Result<Option<String>, DomainError> {
        let flash: Option<Option<String>> =
            sqlx::query_scalar("SELECT flash FROM sessions WHERE token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to read flash message: {}", e)))?;

        let Some(flash) = flash.flatten() else {
            return Ok(None);
        };

        let result = sqlx::query("UPDATE sessions SET flash = NULL WHERE token = ? AND flash = ?")
            .bind(token)
            .bind(&flash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear flash message: {}", e)))?;

        Ok((result.rows_affected() > 0).then_some(flash))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to purge sessions: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_session(row: &SqliteRow) -> Result<Session, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed session row: {}", e));

    let token: String = row.try_get("token").map_err(map_err)?;
    let user_id: i64 = row.try_get("user_id").map_err(map_err)?;
    let flash: Option<String> = row.try_get("flash").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;
    let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(map_err)?;

    Ok(Session::new(
        token,
        UserId::new(user_id),
        flash,
        created_at,
        expires_at,
    ))
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Issues, resolves and ends login sessions
#[derive(Debug)]
pub struct SessionService<R: SessionRepository> {
    repository: Arc<R>,
    ttl: Duration,
}

impl<R: SessionRepository> SessionService<R> {
    pub fn new(repository: Arc<R>, ttl: Duration) -> Self {
        Self { repository, ttl }
    }

    /// Open a session for a user who just logged in
    pub async fn start(&self, user_id: UserId) -> Result<Session, DomainError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| DomainError::internal("Session lifetime out of range"))?;
        let session = Session::new(generate_token(), user_id, None, now, expires_at);

        let session = self.repository.create(session).await?;
        info!(user_id = %user_id, "Session started");

        Ok(session)
    }

    /// Look up a live session. Expired sessions are removed and treated as absent.
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, DomainError> {
        let Some(session) = self.repository.get(token).await? else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            debug!(user_id = %session.user_id(), "Dropping expired session");
            self.repository.delete(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub async fn end(&self, token: &str) -> Result<bool, DomainError> {
        let ended = self.repository.delete(token).await?;
        if ended {
            info!("Session ended");
        }

        Ok(ended)
    }

    pub async fn set_flash(&self, token: &str, message: impl Into<String>) -> Result<(), DomainError> {
        self.repository.set_flash(token, Some(message.into())).await
    }

    pub async fn take_flash(&self, token: &str) -> Result<Option<String>, DomainError> {
        self.repository.take_flash(token).await
    }

    /// Remove every expired session
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        self.repository.delete_expired(Utc::now()).await
    }
}
