//! Farmer record storage and service

mod service;
mod sqlite_repository;

pub use service::FarmerService;
pub use sqlite_repository::SqliteFarmerRepository;
