//! Infrastructure layer - SQLite repositories, services and runtime plumbing

pub mod audit;
pub mod farmer;
pub mod farming;
pub mod logging;
pub mod observability;
pub mod product;
pub mod session;
pub mod storage;
pub mod user;
