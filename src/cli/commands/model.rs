//! Model command implementation
//!
//! This module implements the `model` command: build the dimension and fact
//! tables from the silver layer.

use crate::cli::commands::print_stage_summary;
use crate::config::load_config;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the model command
#[derive(Args, Debug)]
pub struct ModelArgs {}

impl ModelArgs {
    /// Execute the model command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting model command");

        let config = load_config(config_path)?;

        let coordinator = match PipelineCoordinator::new(config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                eprintln!("Failed to connect to PostgreSQL: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("⭐ Building star-schema tables");

        let summary = match coordinator.run_model().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Star-schema build failed");
                eprintln!("Star-schema build failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };
        summary.log_summary();

        println!();
        print_stage_summary(&summary);

        Ok(0)
    }
}
