//! Configuration schema types
//!
//! This module defines the configuration structure for FhirLake.

use crate::domain::resource::ALL_RESOURCE_TYPES;
use serde::{Deserialize, Serialize};

/// Main FhirLake configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirLakeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// FHIR endpoint configuration
    pub fhir: FhirConfig,

    /// PostgreSQL configuration
    pub postgres: PostgresConfig,

    /// Bronze snapshot layer configuration
    #[serde(default)]
    pub bronze: BronzeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FhirLakeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.fhir.validate()?;
        self.postgres.validate()?;
        self.bronze.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// FHIR endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server (e.g. `http://hapi.fhir.org/baseR4`)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Row-count limit passed as `_count` on each fetch
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Resource types to ingest; defaults to all supported types
    #[serde(default = "default_resource_types")]
    pub resource_types: Vec<String>,
}

impl FhirConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("fhir.base_url must start with http:// or https://".to_string());
        }

        if self.page_size == 0 {
            return Err("fhir.page_size must be greater than zero".to_string());
        }

        for rt in &self.resource_types {
            rt.parse::<crate::domain::ResourceType>()
                .map_err(|e| format!("fhir.resource_types: {e}"))?;
        }

        Ok(())
    }
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: "http://hapi.fhir.org/baseR4".to_string(),
            timeout_seconds: default_timeout_seconds(),
            page_size: default_page_size(),
            resource_types: default_resource_types(),
        }
    }
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_pg_port")]
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database password
    #[serde(default)]
    pub password: String,

    /// Database name
    pub dbname: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connection acquisition timeout in seconds
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,

    /// Statement timeout in seconds
    #[serde(default = "default_statement_timeout_seconds")]
    pub statement_timeout_seconds: u64,
}

impl PostgresConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("postgres.host cannot be empty".to_string());
        }
        if self.user.is_empty() {
            return Err("postgres.user cannot be empty".to_string());
        }
        if self.dbname.is_empty() {
            return Err("postgres.dbname cannot be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("postgres.max_connections must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Builds a libpq-style connection string from the discrete parameters
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_pg_port(),
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "fhirlake".to_string(),
            max_connections: default_max_connections(),
            connection_timeout_seconds: default_connection_timeout_seconds(),
            statement_timeout_seconds: default_statement_timeout_seconds(),
        }
    }
}

/// Bronze snapshot layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BronzeConfig {
    /// Root directory for snapshot files; resource subfolders live beneath it
    #[serde(default = "default_bronze_root")]
    pub root_dir: String,
}

impl BronzeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root_dir.is_empty() {
            return Err("bronze.root_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for BronzeConfig {
    fn default() -> Self {
        Self {
            root_dir: default_bronze_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation policy (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_page_size() -> usize {
    50
}

fn default_resource_types() -> Vec<String> {
    ALL_RESOURCE_TYPES
        .iter()
        .map(|rt| rt.as_str().to_string())
        .collect()
}

fn default_pg_port() -> u16 {
    5432
}

fn default_max_connections() -> usize {
    10
}

fn default_connection_timeout_seconds() -> u64 {
    30
}

fn default_statement_timeout_seconds() -> u64 {
    60
}

fn default_bronze_root() -> String {
    "data/bronze".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FhirLakeConfig {
        FhirLakeConfig {
            application: ApplicationConfig::default(),
            fhir: FhirConfig::default(),
            postgres: PostgresConfig::default(),
            bronze: BronzeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let mut config = valid_config();
        config.fhir.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = valid_config();
        config.fhir.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_resource_type_rejected() {
        let mut config = valid_config();
        config.fhir.resource_types = vec!["Medication".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_string() {
        let config = PostgresConfig {
            host: "db.example.com".to_string(),
            port: 5433,
            user: "etl".to_string(),
            password: "secret".to_string(),
            dbname: "medical_db".to_string(),
            ..PostgresConfig::default()
        };
        assert_eq!(
            config.connection_string(),
            "host=db.example.com port=5433 user=etl password=secret dbname=medical_db"
        );
    }

    #[test]
    fn test_default_resource_types_cover_all() {
        let config = FhirConfig::default();
        assert_eq!(config.resource_types.len(), 5);
        assert!(config.resource_types.contains(&"Encounter".to_string()));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_content = r#"
[fhir]
base_url = "http://hapi.fhir.org/baseR4"

[postgres]
host = "localhost"
user = "myuser"
dbname = "medical_db"
"#;
        let config: FhirLakeConfig = toml::from_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.fhir.page_size, 50);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.bronze.root_dir, "data/bronze");
    }
}
