//! Command line interface
//!
//! - `serve`: run the web server (default)
//! - `migrate`: apply or revert the database schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Farm Management - farmer records, farming types and agro products
#[derive(Parser)]
#[command(name = "farm-management")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web server
    Serve,

    /// Apply pending migrations, or tear the schema down with --revert
    Migrate(migrate::MigrateArgs),
}

/// Load `.env` and the layered configuration, then start logging
fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };

    logging::init_logging(&config.logging);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["farm-management"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_migrate_revert_flag() {
        let cli = Cli::try_parse_from(["farm-management", "migrate", "--revert"]).unwrap();
        match cli.command {
            Some(Command::Migrate(args)) => assert!(args.revert),
            _ => panic!("expected migrate command"),
        }
    }
}
