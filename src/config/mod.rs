//! Configuration management for FhirLake.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! FhirLake uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`FHIRLAKE_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fhirlake::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fhirlake.toml")?;
//!
//! println!("FHIR endpoint: {}", config.fhir.base_url);
//! println!("Bronze root: {}", config.bronze.root_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "http://hapi.fhir.org/baseR4"
//! page_size = 50
//!
//! [postgres]
//! host = "localhost"
//! port = 5432
//! user = "etl"
//! password = "${FHIRLAKE_PG_PASSWORD}"
//! dbname = "medical_db"
//!
//! [bronze]
//! root_dir = "data/bronze"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BronzeConfig, FhirConfig, FhirLakeConfig, LoggingConfig, PostgresConfig,
};
