//! Migrate command - applies or reverts the schema

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{self, Migrator, SqliteMigrator};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert every applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::load_config();

    let pool = storage::connect(&config.database).await?;
    let migrator = SqliteMigrator::new(pool);

    if args.revert {
        migrator.revert_all().await?;
    } else {
        migrator.run().await?;
    }

    info!(version = ?migrator.version().await?, "Schema is at version");

    Ok(())
}
