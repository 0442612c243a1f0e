use serde::Deserialize;

/// Longest accepted session lifetime (ten years)
const MAX_SESSION_AGE_SECS: i64 = 10 * 366 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub metrics: MetricsConfig,
    pub farming: FarmingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL; `sqlite::memory:` gives a throwaway database
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
    /// Mark the cookie `Secure`; enable when served over HTTPS
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FarmingConfig {
    /// Labels inserted when the farming table is empty at startup
    pub default_types: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://farm.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "farm_session".to_string(),
            max_age_secs: 14 * 24 * 60 * 60,
            secure: false,
        }
    }
}

impl SessionConfig {
    /// Session lifetime, rejected unless it is between one second and ten years
    pub fn ttl(&self) -> Result<chrono::Duration, config::ConfigError> {
        if !(1..=MAX_SESSION_AGE_SECS).contains(&self.max_age_secs) {
            return Err(config::ConfigError::Message(format!(
                "session.max_age_secs must be between 1 and {}, got {}",
                MAX_SESSION_AGE_SECS, self.max_age_secs
            )));
        }

        chrono::Duration::try_seconds(self.max_age_secs).ok_or_else(|| {
            config::ConfigError::Message(format!(
                "session.max_age_secs out of range: {}",
                self.max_age_secs
            ))
        })
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for FarmingConfig {
    fn default() -> Self {
        Self {
            default_types: vec![
                "Seed Farming".to_string(),
                "Organic Farming".to_string(),
                "Dairy Farming".to_string(),
                "Poultry Farming".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("farming.default_types")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration for tests: private in-memory database, quiet metrics
    pub fn for_tests() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            metrics: MetricsConfig {
                enabled: false,
                ..MetricsConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://farm.db?mode=rwc");
        assert_eq!(config.session.max_age_secs, 1_209_600);
        assert!(!config.session.secure);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.farming.default_types.contains(&"Seed Farming".to_string()));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "logging": {"format": "json"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.session.cookie_name, "farm_session");
    }

    #[test]
    fn test_for_tests_uses_memory_database() {
        let config = AppConfig::for_tests();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_session_ttl() {
        let config = SessionConfig::default();
        assert_eq!(config.ttl().unwrap(), chrono::Duration::days(14));

        for max_age_secs in [0, -5, i64::MAX, MAX_SESSION_AGE_SECS + 1] {
            let config = SessionConfig {
                max_age_secs,
                ..SessionConfig::default()
            };
            assert!(config.ttl().is_err(), "{} should be rejected", max_age_secs);
        }
    }
}
