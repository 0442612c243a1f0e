//! Farmer form validation

use thiserror::Error;

use super::entity::FarmerProfile;

/// Oldest accepted age
pub const MAX_AGE: i32 = 150;

/// Errors raised while turning raw form input into a profile
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FarmerValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Age must be a whole number, got '{0}'")]
    InvalidAge(String),

    #[error("Age must be between 0 and {max}", max = MAX_AGE)]
    AgeOutOfRange(i32),
}

/// Raw farmer form input, every field as submitted
#[derive(Debug, Clone, Default)]
pub struct FarmerInput {
    pub farmer_name: String,
    pub adhar_number: String,
    pub age: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
    pub farming_type: String,
}

impl FarmerInput {
    /// Trim every field, require the text fields and parse the age
    pub fn into_profile(self) -> Result<FarmerProfile, FarmerValidationError> {
        let farmer_name = required("Farmer name", &self.farmer_name)?;
        let adhar_number = required("Aadhaar number", &self.adhar_number)?;
        let age = parse_age(&self.age)?;
        let gender = required("Gender", &self.gender)?;
        let phone_number = required("Phone number", &self.phone_number)?;
        let address = required("Address", &self.address)?;
        let farming = required("Farming type", &self.farming_type)?;

        Ok(FarmerProfile {
            farmer_name,
            adhar_number,
            age,
            gender,
            phone_number,
            address,
            farming,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FarmerValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(FarmerValidationError::MissingField(field));
    }

    Ok(trimmed.to_string())
}

fn parse_age(value: &str) -> Result<i32, FarmerValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(FarmerValidationError::MissingField("Age"));
    }

    let age: i32 = trimmed
        .parse()
        .map_err(|_| FarmerValidationError::InvalidAge(trimmed.to_string()))?;

    if !(0..=MAX_AGE).contains(&age) {
        return Err(FarmerValidationError::AgeOutOfRange(age));
    }

    Ok(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> FarmerInput {
        FarmerInput {
            farmer_name: "John Doe".to_string(),
            adhar_number: "123456789012".to_string(),
            age: "35".to_string(),
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
            address: "123 Main Street".to_string(),
            farming_type: "Seed Farming".to_string(),
        }
    }

    #[test]
    fn test_age_is_parsed_to_integer() {
        let profile = valid_input().into_profile().unwrap();
        assert_eq!(profile.age, 35);
        assert_eq!(profile.farming, "Seed Farming");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let input = FarmerInput {
            farmer_name: "  John Doe ".to_string(),
            age: " 40 ".to_string(),
            ..valid_input()
        };

        let profile = input.into_profile().unwrap();
        assert_eq!(profile.farmer_name, "John Doe");
        assert_eq!(profile.age, 40);
    }

    #[test]
    fn test_missing_name() {
        let input = FarmerInput {
            farmer_name: "   ".to_string(),
            ..valid_input()
        };

        assert_eq!(
            input.into_profile(),
            Err(FarmerValidationError::MissingField("Farmer name"))
        );
    }

    #[test]
    fn test_malformed_age() {
        let input = FarmerInput {
            age: "thirty".to_string(),
            ..valid_input()
        };

        assert_eq!(
            input.into_profile(),
            Err(FarmerValidationError::InvalidAge("thirty".to_string()))
        );
    }

    #[test]
    fn test_age_out_of_range() {
        let input = FarmerInput {
            age: "-1".to_string(),
            ..valid_input()
        };
        assert_eq!(input.into_profile(), Err(FarmerValidationError::AgeOutOfRange(-1)));

        let input = FarmerInput {
            age: "151".to_string(),
            ..valid_input()
        };
        assert_eq!(input.into_profile(), Err(FarmerValidationError::AgeOutOfRange(151)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FarmerValidationError::MissingField("Address").to_string(),
            "Address is required"
        );
        assert_eq!(
            FarmerValidationError::AgeOutOfRange(200).to_string(),
            "Age must be between 0 and 150"
        );
    }
}
