//! Farmer record service

use std::sync::Arc;

use tracing::info;

use crate::domain::farmer::{Farmer, FarmerId, FarmerInput, FarmerRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct FarmerService<R: FarmerRepository> {
    repository: Arc<R>,
}

impl<R: FarmerRepository> FarmerService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Farmer>, DomainError> {
        self.repository.list().await
    }

    pub async fn get(&self, rid: FarmerId) -> Result<Option<Farmer>, DomainError> {
        self.repository.get(rid).await
    }

    /// Validate the form and insert a new record
    pub async fn create(&self, input: FarmerInput) -> Result<Farmer, DomainError> {
        let profile = input
            .into_profile()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let farmer = self.repository.create(profile).await?;
        info!(rid = %farmer.rid(), "Farmer registered");

        Ok(farmer)
    }

    /// Overwrite every field of an existing record
    pub async fn update(&self, rid: FarmerId, input: FarmerInput) -> Result<Farmer, DomainError> {
        let profile = input
            .into_profile()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let farmer = self
            .repository
            .update(rid, profile)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Farmer '{}' not found", rid)))?;
        info!(rid = %rid, "Farmer updated");

        Ok(farmer)
    }

    /// Delete a record. Missing records are not an error.
    pub async fn delete(&self, rid: FarmerId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(rid).await?;
        if deleted {
            info!(rid = %rid, "Farmer deleted");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::farmer::{FarmerProfile, MockFarmerRepository};

    fn input(age: &str) -> FarmerInput {
        FarmerInput {
            farmer_name: "John Doe".to_string(),
            adhar_number: "123456789012".to_string(),
            age: age.to_string(),
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
            address: "123 Main Street".to_string(),
            farming_type: "Seed Farming".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_parses_age() {
        let mut repository = MockFarmerRepository::new();
        repository
            .expect_create()
            .withf(|profile: &FarmerProfile| profile.age == 35)
            .returning(|profile| Ok(Farmer::new(FarmerId::new(1), profile)));

        let service = FarmerService::new(Arc::new(repository));
        let farmer = service.create(input("35")).await.unwrap();

        assert_eq!(farmer.age(), 35);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_storage() {
        let mut repository = MockFarmerRepository::new();
        repository.expect_create().never();
        repository.expect_update().never();

        let service = FarmerService::new(Arc::new(repository));

        let err = service.create(input("abc")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = service.update(FarmerId::new(1), input("")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut repository = MockFarmerRepository::new();
        repository.expect_update().returning(|_, _| Ok(None));

        let service = FarmerService::new(Arc::new(repository));
        let err = service.update(FarmerId::new(7), input("35")).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let mut repository = MockFarmerRepository::new();
        repository.expect_delete().returning(|_| Ok(false));

        let service = FarmerService::new(Arc::new(repository));

        assert!(!service.delete(FarmerId::new(7)).await.unwrap());
    }
}
