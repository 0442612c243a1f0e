//! Farming type storage and service

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

use crate::domain::farming::{normalize_farming_type, FarmingType, FarmingTypeRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct SqliteFarmingTypeRepository {
    pool: SqlitePool,
}

impl SqliteFarmingTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FarmingTypeRepository for SqliteFarmingTypeRepository {
    async fn list(&self) -> Result<Vec<FarmingType>, DomainError> {
        let rows = sqlx::query("SELECT fid, farming_type FROM farming ORDER BY fid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list farming types: {}", e)))?;

        rows.iter().map(row_to_farming_type).collect()
    }

    async fn get_by_label(&self, label: &str) -> Result<Option<FarmingType>, DomainError> {
        let row = sqlx::query("SELECT fid, farming_type FROM farming WHERE farming_type = ?")
            .bind(label)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get farming type: {}", e)))?;

        row.as_ref().map(row_to_farming_type).transpose()
    }

    async fn create(&self, label: &str) -> Result<FarmingType, DomainError> {
        let result = sqlx::query("INSERT INTO farming (farming_type) VALUES (?)")
            .bind(label)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    DomainError::conflict(format!("Farming type '{}' already exists", label))
                } else {
                    DomainError::storage(format!("Failed to create farming type: {}", e))
                }
            })?;

        Ok(FarmingType::new(result.last_insert_rowid(), label))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farming")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count farming types: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_farming_type(row: &SqliteRow) -> Result<FarmingType, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed farming row: {}", e));

    let id: i64 = row.try_get("fid").map_err(map_err)?;
    let label: String = row.try_get("farming_type").map_err(map_err)?;

    Ok(FarmingType::new(id, label))
}

#[derive(Debug)]
pub struct FarmingService<R: FarmingTypeRepository> {
    repository: Arc<R>,
}

impl<R: FarmingTypeRepository> FarmingService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<FarmingType>, DomainError> {
        self.repository.list().await
    }

    /// Add a label. Duplicates fail with `Conflict`.
    pub async fn add(&self, label: &str) -> Result<FarmingType, DomainError> {
        let label = normalize_farming_type(label)?;

        if self.repository.get_by_label(&label).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Farming type '{}' already exists",
                label
            )));
        }

        let farming = self.repository.create(&label).await?;
        info!(farming_type = %farming.label(), "Farming type added");

        Ok(farming)
    }

    /// Insert the given labels, but only into an empty table.
    /// Returns how many were inserted.
    pub async fn seed_defaults(&self, labels: &[String]) -> Result<usize, DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for label in labels {
            match self.add(label).await {
                Ok(_) => inserted += 1,
                Err(DomainError::Conflict { .. }) | Err(DomainError::Validation { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        if inserted > 0 {
            info!(count = inserted, "Seeded default farming types");
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::farming::MockFarmingTypeRepository;
    use crate::infrastructure::storage::migrated_test_pool;

    async fn create_service() -> FarmingService<SqliteFarmingTypeRepository> {
        let repository = SqliteFarmingTypeRepository::new(migrated_test_pool().await);
        FarmingService::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let service = create_service().await;

        service.add("Seed Farming").await.unwrap();
        service.add("  Organic Farming ").await.unwrap();

        let labels: Vec<String> = service
            .list()
            .await
            .unwrap()
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        assert_eq!(labels, vec!["Seed Farming", "Organic Farming"]);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_conflict() {
        let service = create_service().await;

        service.add("Seed Farming").await.unwrap();
        let err = service.add("Seed Farming").await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_defaults_only_when_empty() {
        let service = create_service().await;
        let defaults = vec!["Dairy".to_string(), "Poultry".to_string(), "Dairy".to_string()];

        assert_eq!(service.seed_defaults(&defaults).await.unwrap(), 2);
        assert_eq!(service.seed_defaults(&defaults).await.unwrap(), 0);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_label_never_reaches_storage() {
        let mut repository = MockFarmingTypeRepository::new();
        repository.expect_get_by_label().never();
        repository.expect_create().never();

        let service = FarmingService::new(Arc::new(repository));
        let err = service.add("   ").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
