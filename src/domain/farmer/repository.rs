//! Farmer repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{Farmer, FarmerId, FarmerProfile};
use crate::domain::DomainError;

/// Repository trait for farmer records.
///
/// Implementations record an audit entry for every successful insert, update
/// and delete as part of the same write.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FarmerRepository: Send + Sync {
    /// All farmer records ordered by id
    async fn list(&self) -> Result<Vec<Farmer>, DomainError>;

    /// Get a farmer by id
    async fn get(&self, rid: FarmerId) -> Result<Option<Farmer>, DomainError>;

    /// Insert a new farmer
    async fn create(&self, profile: FarmerProfile) -> Result<Farmer, DomainError>;

    /// Overwrite every field of an existing farmer. Returns `None` when absent.
    async fn update(
        &self,
        rid: FarmerId,
        profile: FarmerProfile,
    ) -> Result<Option<Farmer>, DomainError>;

    /// Delete a farmer. Returns whether a row was removed.
    async fn delete(&self, rid: FarmerId) -> Result<bool, DomainError>;
}
