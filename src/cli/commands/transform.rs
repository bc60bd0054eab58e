//! Transform command implementation
//!
//! This module implements the `transform` command: read each bronze table,
//! normalize its columns, and replace the corresponding silver table.

use crate::cli::commands::{print_stage_summary, stage_exit_code};
use crate::config::load_config;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the transform command
#[derive(Args, Debug)]
pub struct TransformArgs {}

impl TransformArgs {
    /// Execute the transform command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting transform command");

        let config = load_config(config_path)?;

        let coordinator = match PipelineCoordinator::new(config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                eprintln!("Failed to connect to PostgreSQL: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("🔄 Transforming bronze tables into silver tables");

        let summary = coordinator.run_transform().await?;
        summary.log_summary();

        println!();
        print_stage_summary(&summary);

        Ok(stage_exit_code(&summary))
    }
}
