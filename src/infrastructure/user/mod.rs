//! User infrastructure module
//!
//! Argon2 password hashing, the SQLite user repository, and the user service
//! behind signup and login.

mod password;
mod service;
mod sqlite_repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{SignupRequest, UserService};
pub use sqlite_repository::SqliteUserRepository;
