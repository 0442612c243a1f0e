//! SQLite farmer repository
//!
//! Every mutation runs in a transaction that also appends the matching
//! `farmer_audit` row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};

use crate::domain::audit::AuditAction;
use crate::domain::farmer::{Farmer, FarmerId, FarmerProfile, FarmerRepository};
use crate::domain::DomainError;

const SELECT_FARMER: &str = r#"
    SELECT rid, farmer_name, adhar_number, age, gender, phone_number, address, farming
    FROM register
"#;

#[derive(Debug, Clone)]
pub struct SqliteFarmerRepository {
    pool: SqlitePool,
}

impl SqliteFarmerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
    }
}

async fn record_audit(
    tx: &mut Transaction<'static, Sqlite>,
    rid: FarmerId,
    action: AuditAction,
) -> Result<(), DomainError> {
    sqlx::query("INSERT INTO farmer_audit (rid, action, timestamp) VALUES (?, ?, ?)")
        .bind(rid.value())
        .bind(action.as_str())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record audit entry: {}", e)))?;

    Ok(())
}

async fn commit(tx: Transaction<'static, Sqlite>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
}

#[async_trait]
impl FarmerRepository for SqliteFarmerRepository {
    async fn list(&self) -> Result<Vec<Farmer>, DomainError> {
        let rows = sqlx::query(&format!("{} ORDER BY rid", SELECT_FARMER))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list farmers: {}", e)))?;

        rows.iter().map(row_to_farmer).collect()
    }

    async fn get(&self, rid: FarmerId) -> Result<Option<Farmer>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE rid = ?", SELECT_FARMER))
            .bind(rid.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get farmer: {}", e)))?;

        row.as_ref().map(row_to_farmer).transpose()
    }

    async fn create(&self, profile: FarmerProfile) -> Result<Farmer, DomainError> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO register
                (farmer_name, adhar_number, age, gender, phone_number, address, farming)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.farmer_name)
        .bind(&profile.adhar_number)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.phone_number)
        .bind(&profile.address)
        .bind(&profile.farming)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create farmer: {}", e)))?;

        let rid = FarmerId::new(result.last_insert_rowid());
        record_audit(&mut tx, rid, AuditAction::Inserted).await?;
        commit(tx).await?;

        Ok(Farmer::new(rid, profile))
    }

    async fn update(
        &self,
        rid: FarmerId,
        profile: FarmerProfile,
    ) -> Result<Option<Farmer>, DomainError> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE register
            SET farmer_name = ?, adhar_number = ?, age = ?, gender = ?,
                phone_number = ?, address = ?, farming = ?
            WHERE rid = ?
            "#,
        )
        .bind(&profile.farmer_name)
        .bind(&profile.adhar_number)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.phone_number)
        .bind(&profile.address)
        .bind(&profile.farming)
        .bind(rid.value())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update farmer: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        record_audit(&mut tx, rid, AuditAction::Updated).await?;
        commit(tx).await?;

        Ok(Some(Farmer::new(rid, profile)))
    }

    async fn delete(&self, rid: FarmerId) -> Result<bool, DomainError> {
        let mut tx = self.begin().await?;

        let result = sqlx::query("DELETE FROM register WHERE rid = ?")
            .bind(rid.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete farmer: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        record_audit(&mut tx, rid, AuditAction::Deleted).await?;
        commit(tx).await?;

        Ok(true)
    }
}

fn row_to_farmer(row: &SqliteRow) -> Result<Farmer, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed farmer row: {}", e));

    let profile = FarmerProfile {
        farmer_name: row.try_get("farmer_name").map_err(map_err)?,
        adhar_number: row.try_get("adhar_number").map_err(map_err)?,
        age: row.try_get("age").map_err(map_err)?,
        gender: row.try_get("gender").map_err(map_err)?,
        phone_number: row.try_get("phone_number").map_err(map_err)?,
        address: row.try_get("address").map_err(map_err)?,
        farming: row.try_get("farming").map_err(map_err)?,
    };
    let rid: i64 = row.try_get("rid").map_err(map_err)?;

    Ok(Farmer::new(FarmerId::new(rid), profile))
}
