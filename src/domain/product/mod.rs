//! Agro product listings
//!
//! Products are posted by signed-in users; the owner's username and email are
//! copied onto the listing when it is created.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised while validating a product form
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Price must be a whole number of at least 0, got '{0}'")]
    InvalidPrice(String),
}

/// A product listing that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub owner_username: String,
    pub owner_email: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Raw product form input
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: String,
}

impl ProductInput {
    /// Validate the form and attach the owner
    pub fn into_new_product(
        self,
        owner_username: &str,
        owner_email: &str,
    ) -> Result<NewProduct, ProductValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::MissingField("Product name"));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ProductValidationError::MissingField("Product description"));
        }

        let price_text = self.price.trim();
        let price: i64 = price_text
            .parse()
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| ProductValidationError::InvalidPrice(price_text.to_string()))?;

        Ok(NewProduct {
            owner_username: owner_username.to_string(),
            owner_email: owner_email.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
        })
    }
}

/// A persisted product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pid: i64,
    owner_username: String,
    owner_email: String,
    name: String,
    description: String,
    price: i64,
}

impl Product {
    pub fn from_new(pid: i64, product: NewProduct) -> Self {
        Self {
            pid,
            owner_username: product.owner_username,
            owner_email: product.owner_email,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }

    pub fn pid(&self) -> i64 {
        self.pid
    }

    pub fn owner_username(&self) -> &str {
        &self.owner_username
    }

    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> i64 {
        self.price
    }
}

/// Repository trait for product listings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id
    async fn list(&self) -> Result<Vec<Product>, DomainError>;

    /// Insert a product listing
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
}
