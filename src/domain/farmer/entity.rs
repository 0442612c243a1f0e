//! Farmer entity

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Database-assigned farmer identifier (`rid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FarmerId(i64);

impl FarmerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Parse an id taken from a URL path segment
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a farmer id", raw)))
    }
}

impl std::fmt::Display for FarmerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every field of a farmer record except its id. Create and update both
/// replace the full profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub farmer_name: String,
    /// National ID (Aadhaar) number, kept as text to preserve leading zeros
    pub adhar_number: String,
    pub age: i32,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
    /// Free-text farming type label; not checked against the farming table
    pub farming: String,
}

/// A persisted farmer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    rid: FarmerId,
    #[serde(flatten)]
    profile: FarmerProfile,
}

impl Farmer {
    pub fn new(rid: FarmerId, profile: FarmerProfile) -> Self {
        Self { rid, profile }
    }

    pub fn rid(&self) -> FarmerId {
        self.rid
    }

    pub fn profile(&self) -> &FarmerProfile {
        &self.profile
    }

    pub fn farmer_name(&self) -> &str {
        &self.profile.farmer_name
    }

    pub fn age(&self) -> i32 {
        self.profile.age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> FarmerProfile {
        FarmerProfile {
            farmer_name: name.to_string(),
            adhar_number: "123456789012".to_string(),
            age: 35,
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
            address: "123 Main Street".to_string(),
            farming: "Seed Farming".to_string(),
        }
    }

    #[test]
    fn test_farmer_accessors() {
        let farmer = Farmer::new(FarmerId::new(3), profile("John Doe"));

        assert_eq!(farmer.rid().value(), 3);
        assert_eq!(farmer.farmer_name(), "John Doe");
        assert_eq!(farmer.age(), 35);
        assert_eq!(farmer.profile().farming, "Seed Farming");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(FarmerId::parse("42").unwrap(), FarmerId::new(42));

        let err = FarmerId::parse("abc").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId { .. }));
        assert_eq!(err.message(), "'abc' is not a farmer id");
    }

    #[test]
    fn test_serialization_is_flat() {
        let farmer = Farmer::new(FarmerId::new(1), profile("John Doe"));
        let json = serde_json::to_value(&farmer).unwrap();

        assert_eq!(json["rid"], 1);
        assert_eq!(json["farmer_name"], "John Doe");
        assert_eq!(json["age"], 35);
    }
}
