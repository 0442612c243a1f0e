//! User service for signup and login

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Signup form data
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User service for authentication and account lookup
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account.
    ///
    /// Fails with `Conflict` when the email is already registered, in which
    /// case nothing is written.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        let username = request.username.trim();
        let email = request.email.trim();

        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id(), "User signed up");

        Ok(user)
    }

    /// Check an email and password pair. Returns `None` on any mismatch.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repository.get_by_email(email.trim()).await? else {
            warn!("Login attempt for unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, user.password_hash()) {
            warn!(user_id = %user.id(), "Login attempt with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }
}
