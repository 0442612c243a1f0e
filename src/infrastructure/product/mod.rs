//! Agro product storage and service

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

use crate::domain::product::{NewProduct, Product, ProductInput, ProductRepository};
use crate::domain::user::User;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT pid, username, email, product_name, product_desc, price
            FROM agro_products
            ORDER BY pid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        rows.iter().map(row_to_product).collect()
    }

    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO agro_products (username, email, product_name, product_desc, price)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.owner_username)
        .bind(&product.owner_email)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create product: {}", e)))?;

        Ok(Product::from_new(result.last_insert_rowid(), product))
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed product row: {}", e));

    let pid: i64 = row.try_get("pid").map_err(map_err)?;
    let product = NewProduct {
        owner_username: row.try_get("username").map_err(map_err)?,
        owner_email: row.try_get("email").map_err(map_err)?,
        name: row.try_get("product_name").map_err(map_err)?,
        description: row.try_get("product_desc").map_err(map_err)?,
        price: row.try_get("price").map_err(map_err)?,
    };

    Ok(Product::from_new(pid, product))
}

#[derive(Debug)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.list().await
    }

    /// Validate the form and list the product under `owner`
    pub async fn create(&self, owner: &User, input: ProductInput) -> Result<Product, DomainError> {
        let product = input
            .into_new_product(owner.username(), owner.email())
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let product = self.repository.create(product).await?;
        info!(pid = product.pid(), owner = %owner.id(), "Product added");

        Ok(product)
    }
}
