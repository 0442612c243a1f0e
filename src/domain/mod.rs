//! Domain layer - Core business logic and entities

pub mod audit;
pub mod error;
pub mod farmer;
pub mod farming;
pub mod product;
pub mod session;
pub mod user;

pub use audit::{AuditAction, AuditEntry, AuditRepository};
pub use error::DomainError;
pub use farmer::{Farmer, FarmerId, FarmerInput, FarmerProfile, FarmerRepository};
pub use farming::{FarmingType, FarmingTypeRepository};
pub use product::{NewProduct, Product, ProductInput, ProductRepository};
pub use session::{Session, SessionRepository};
pub use user::{NewUser, User, UserId, UserRepository};
