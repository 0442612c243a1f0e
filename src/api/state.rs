//! Application state for shared services

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::SessionConfig;
use crate::domain::audit::AuditRepository;
use crate::domain::farmer::FarmerRepository;
use crate::domain::farming::FarmingTypeRepository;
use crate::domain::product::ProductRepository;
use crate::domain::session::SessionRepository;
use crate::domain::user::UserRepository;
use crate::domain::{
    AuditEntry, DomainError, Farmer, FarmerId, FarmerInput, FarmingType, Product, ProductInput,
    Session, User, UserId,
};
use crate::infrastructure::audit::AuditService;
use crate::infrastructure::farmer::FarmerService;
use crate::infrastructure::farming::FarmingService;
use crate::infrastructure::product::ProductService;
use crate::infrastructure::session::SessionService;
use crate::infrastructure::user::{PasswordHasher, SignupRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub session_service: Arc<dyn SessionServiceTrait>,
    pub farmer_service: Arc<dyn FarmerServiceTrait>,
    pub farming_service: Arc<dyn FarmingServiceTrait>,
    pub product_service: Arc<dyn ProductServiceTrait>,
    pub audit_service: Arc<dyn AuditServiceTrait>,
    pub session_config: SessionConfig,
    /// Kept for the readiness probe
    pub pool: SqlitePool,
}

#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
}

#[async_trait::async_trait]
pub trait SessionServiceTrait: Send + Sync {
    async fn start(&self, user_id: UserId) -> Result<Session, DomainError>;
    async fn resolve(&self, token: &str) -> Result<Option<Session>, DomainError>;
    async fn end(&self, token: &str) -> Result<bool, DomainError>;
    async fn set_flash(&self, token: &str, message: String) -> Result<(), DomainError>;
    async fn take_flash(&self, token: &str) -> Result<Option<String>, DomainError>;
    async fn purge_expired(&self) -> Result<u64, DomainError>;
}

#[async_trait::async_trait]
pub trait FarmerServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<Farmer>, DomainError>;
    async fn get(&self, rid: FarmerId) -> Result<Option<Farmer>, DomainError>;
    async fn create(&self, input: FarmerInput) -> Result<Farmer, DomainError>;
    async fn update(&self, rid: FarmerId, input: FarmerInput) -> Result<Farmer, DomainError>;
    async fn delete(&self, rid: FarmerId) -> Result<bool, DomainError>;
}

#[async_trait::async_trait]
pub trait FarmingServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<FarmingType>, DomainError>;
    async fn add(&self, label: &str) -> Result<FarmingType, DomainError>;
    async fn seed_defaults(&self, labels: &[String]) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
pub trait ProductServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn create(&self, owner: &User, input: ProductInput) -> Result<Product, DomainError>;
}

#[async_trait::async_trait]
pub trait AuditServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<AuditEntry>, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        UserService::signup(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: SessionRepository + 'static> SessionServiceTrait for SessionService<R> {
    async fn start(&self, user_id: UserId) -> Result<Session, DomainError> {
        SessionService::start(self, user_id).await
    }

    async fn resolve(&self, token: &str) -> Result<Option<Session>, DomainError> {
        SessionService::resolve(self, token).await
    }

    async fn end(&self, token: &str) -> Result<bool, DomainError> {
        SessionService::end(self, token).await
    }

    async fn set_flash(&self, token: &str, message: String) -> Result<(), DomainError> {
        SessionService::set_flash(self, token, message).await
    }

    async fn take_flash(&self, token: &str) -> Result<Option<String>, DomainError> {
        SessionService::take_flash(self, token).await
    }

    async fn purge_expired(&self) -> Result<u64, DomainError> {
        SessionService::purge_expired(self).await
    }
}

#[async_trait::async_trait]
impl<R: FarmerRepository + 'static> FarmerServiceTrait for FarmerService<R> {
    async fn list(&self) -> Result<Vec<Farmer>, DomainError> {
        FarmerService::list(self).await
    }

    async fn get(&self, rid: FarmerId) -> Result<Option<Farmer>, DomainError> {
        FarmerService::get(self, rid).await
    }

    async fn create(&self, input: FarmerInput) -> Result<Farmer, DomainError> {
        FarmerService::create(self, input).await
    }

    async fn update(&self, rid: FarmerId, input: FarmerInput) -> Result<Farmer, DomainError> {
        FarmerService::update(self, rid, input).await
    }

    async fn delete(&self, rid: FarmerId) -> Result<bool, DomainError> {
        FarmerService::delete(self, rid).await
    }
}

#[async_trait::async_trait]
impl<R: FarmingTypeRepository + 'static> FarmingServiceTrait for FarmingService<R> {
    async fn list(&self) -> Result<Vec<FarmingType>, DomainError> {
        FarmingService::list(self).await
    }

    async fn add(&self, label: &str) -> Result<FarmingType, DomainError> {
        FarmingService::add(self, label).await
    }

    async fn seed_defaults(&self, labels: &[String]) -> Result<usize, DomainError> {
        FarmingService::seed_defaults(self, labels).await
    }
}

#[async_trait::async_trait]
impl<R: ProductRepository + 'static> ProductServiceTrait for ProductService<R> {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        ProductService::list(self).await
    }

    async fn create(&self, owner: &User, input: ProductInput) -> Result<Product, DomainError> {
        ProductService::create(self, owner, input).await
    }
}

#[async_trait::async_trait]
impl<R: AuditRepository + 'static> AuditServiceTrait for AuditService<R> {
    async fn list(&self) -> Result<Vec<AuditEntry>, DomainError> {
        AuditService::list(self).await
    }
}
