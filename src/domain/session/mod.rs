//! Server-side login sessions
//!
//! The browser only holds an opaque token in a cookie; the user id, expiry and
//! any pending flash message live in storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// A login session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user_id: UserId,
    flash: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        user_id: UserId,
        flash: Option<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            user_id,
            flash,
            created_at,
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn flash(&self) -> Option<&str> {
        self.flash.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Repository trait for sessions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> Result<Session, DomainError>;

    async fn get(&self, token: &str) -> Result<Option<Session>, DomainError>;

    /// Remove a session. Returns whether one existed.
    async fn delete(&self, token: &str) -> Result<bool, DomainError>;

    /// Replace the pending flash message
    async fn set_flash(&self, token: &str, message: Option<String>) -> Result<(), DomainError>;

    /// Read and clear the pending flash message
    async fn take_flash(&self, token: &str) -> Result<Option<String>, DomainError>;

    /// Drop every session that expired before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session::new("tok", UserId::new(1), None, now, now + Duration::hours(1));

        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::hours(1)));
        assert_eq!(session.token(), "tok");
        assert!(session.flash().is_none());
    }
}
