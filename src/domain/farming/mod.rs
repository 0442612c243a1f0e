//! Farming type reference data
//!
//! Farming types populate the choice list on the farmer forms. Farmer records
//! store the label as free text, so removing or renaming a type never touches
//! existing farmers.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length of a farming type label
pub const MAX_FARMING_TYPE_LENGTH: usize = 100;

/// A farming type label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmingType {
    id: i64,
    label: String,
}

impl FarmingType {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Normalize and check a label submitted from the form
pub fn normalize_farming_type(label: &str) -> Result<String, DomainError> {
    let trimmed = label.trim();

    if trimmed.is_empty() {
        return Err(DomainError::validation("Farming type is required"));
    }

    if trimmed.chars().count() > MAX_FARMING_TYPE_LENGTH {
        return Err(DomainError::validation(format!(
            "Farming type exceeds maximum length of {} characters",
            MAX_FARMING_TYPE_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

/// Repository trait for farming types
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FarmingTypeRepository: Send + Sync {
    /// All farming types ordered by id
    async fn list(&self) -> Result<Vec<FarmingType>, DomainError>;

    /// Look up a farming type by its exact label
    async fn get_by_label(&self, label: &str) -> Result<Option<FarmingType>, DomainError>;

    /// Insert a new label, failing with a conflict when it already exists
    async fn create(&self, label: &str) -> Result<FarmingType, DomainError>;

    /// Number of stored farming types
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_farming_type("  Seed Farming ").unwrap(), "Seed Farming");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        let err = normalize_farming_type("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_normalize_rejects_long_label() {
        let label = "x".repeat(MAX_FARMING_TYPE_LENGTH + 1);
        assert!(normalize_farming_type(&label).is_err());
    }

    #[test]
    fn test_farming_type_accessors() {
        let farming = FarmingType::new(2, "Organic Farming");
        assert_eq!(farming.id(), 2);
        assert_eq!(farming.label(), "Organic Farming");
    }
}
