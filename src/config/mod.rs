//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, DatabaseConfig, FarmingConfig, LogFormat, LoggingConfig, MetricsConfig,
    ServerConfig, SessionConfig,
};
