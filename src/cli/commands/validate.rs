//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the FhirLake configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so a returned config is valid
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  FHIR Server: {}", config.fhir.base_url);
        println!("  Page Size: {}", config.fhir.page_size);
        println!(
            "  Resource Types: {}",
            config.fhir.resource_types.join(", ")
        );
        println!(
            "  PostgreSQL: {}:{}/{}",
            config.postgres.host, config.postgres.port, config.postgres.dbname
        );
        println!("  Max Connections: {}", config.postgres.max_connections);
        println!("  Bronze Root: {}", config.bronze.root_dir);
        println!();

        Ok(0)
    }
}
