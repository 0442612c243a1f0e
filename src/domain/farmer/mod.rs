//! Farmer registration domain
//!
//! A farmer record (historically called a "register" row) captures the
//! details collected by the registration form.

mod entity;
mod repository;
mod validation;

pub use entity::{Farmer, FarmerId, FarmerProfile};
pub use repository::FarmerRepository;
pub use validation::{FarmerInput, FarmerValidationError, MAX_AGE};

#[cfg(test)]
pub use repository::MockFarmerRepository;
