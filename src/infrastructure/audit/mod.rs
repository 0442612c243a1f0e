//! Farmer audit trail storage
//!
//! Rows are only ever written by `SqliteFarmerRepository`; this side reads them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::audit::{AuditAction, AuditEntry, AuditRepository};
use crate::domain::farmer::FarmerId;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct SqliteAuditRepository {
    pool: SqlitePool,
}

impl SqliteAuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for SqliteAuditRepository {
    async fn list(&self) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, rid, action, timestamp FROM farmer_audit ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list audit entries: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn list_for_farmer(&self, rid: FarmerId) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, rid, action, timestamp FROM farmer_audit WHERE rid = ? ORDER BY id",
        )
        .bind(rid.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list audit entries: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<AuditEntry, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed audit row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let rid: i64 = row.try_get("rid").map_err(map_err)?;
    let action: String = row.try_get("action").map_err(map_err)?;
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(map_err)?;

    let action = AuditAction::parse(&action)
        .ok_or_else(|| DomainError::storage(format!("Unknown audit action '{}'", action)))?;

    Ok(AuditEntry::new(id, FarmerId::new(rid), action, timestamp))
}

/// Read-only audit trail service
#[derive(Debug)]
pub struct AuditService<R: AuditRepository> {
    repository: std::sync::Arc<R>,
}

impl<R: AuditRepository> AuditService<R> {
    pub fn new(repository: std::sync::Arc<R>) -> Self {
        Self { repository }
    }

    /// Every entry, newest first
    pub async fn list(&self) -> Result<Vec<AuditEntry>, DomainError> {
        self.repository.list().await
    }
}
