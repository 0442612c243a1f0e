//! Farm Management
//!
//! A small server-rendered web application for running a farm co-operative:
//! - Account signup, login and logout with server-side sessions
//! - Farmer registration records with a full audit trail
//! - Farming type reference data and agro product listings

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    audit::{AuditService, SqliteAuditRepository},
    farmer::{FarmerService, SqliteFarmerRepository},
    farming::{FarmingService, SqliteFarmingTypeRepository},
    product::{ProductService, SqliteProductRepository},
    session::{SessionService, SqliteSessionRepository},
    storage::{self, run_schema_migrations},
    user::{Argon2Hasher, SqliteUserRepository, UserService},
};
use sqlx::SqlitePool;
use tracing::info;

/// Create the application state with custom configuration.
///
/// Opens the configured database, applies pending migrations and seeds the
/// default farming types.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = storage::connect(&config.database).await?;
    run_schema_migrations(&pool).await?;

    create_app_state_with_pool(pool, config).await
}

/// Create the application state over an already migrated pool
pub async fn create_app_state_with_pool(
    pool: SqlitePool,
    config: &AppConfig,
) -> anyhow::Result<AppState> {
    let user_service = Arc::new(UserService::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(Argon2Hasher::new()),
    ));

    let session_service = Arc::new(SessionService::new(
        Arc::new(SqliteSessionRepository::new(pool.clone())),
        config.session.ttl()?,
    ));
    let purged = session_service.purge_expired().await?;
    if purged > 0 {
        info!(count = purged, "Removed expired sessions");
    }

    let farming_service = Arc::new(FarmingService::new(Arc::new(
        SqliteFarmingTypeRepository::new(pool.clone()),
    )));
    farming_service
        .seed_defaults(&config.farming.default_types)
        .await?;

    let farmer_service = Arc::new(FarmerService::new(Arc::new(SqliteFarmerRepository::new(
        pool.clone(),
    ))));
    let product_service = Arc::new(ProductService::new(Arc::new(SqliteProductRepository::new(
        pool.clone(),
    ))));
    let audit_service = Arc::new(AuditService::new(Arc::new(SqliteAuditRepository::new(
        pool.clone(),
    ))));

    info!("Application state initialized");

    Ok(AppState {
        user_service,
        session_service,
        farmer_service,
        farming_service,
        product_service,
        audit_service,
        session_config: config.session.clone(),
        pool,
    })
}
