//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fhirlake.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing FhirLake configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Write to file
        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set FHIRLAKE_PG_PASSWORD");
                println!("  3. Validate configuration: fhirlake validate-config");
                println!("  4. Run the pipeline: fhirlake run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Sample configuration content
    fn sample_config() -> &'static str {
        r#"# FhirLake Configuration File
# FHIR to PostgreSQL star-schema ETL tool

[application]
log_level = "info"

[fhir]
base_url = "http://hapi.fhir.org/baseR4"
timeout_seconds = 30
page_size = 50
resource_types = ["Patient", "Practitioner", "Condition", "Observation", "Encounter"]

[postgres]
host = "localhost"
port = 5432
user = "postgres"
password = "${FHIRLAKE_PG_PASSWORD}"
dbname = "medical_db"
max_connections = 10

[bronze]
root_dir = "data/bronze"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
    }
}
