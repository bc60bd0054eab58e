//! Ingest command implementation
//!
//! This module implements the `ingest` command: load bronze Parquet
//! snapshots into PostgreSQL tables.

use crate::cli::commands::{print_stage_summary, stage_exit_code};
use crate::config::load_config;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        let config = load_config(config_path)?;

        let coordinator = match PipelineCoordinator::new(config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                eprintln!("Failed to connect to PostgreSQL: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("📥 Loading bronze snapshots into PostgreSQL");

        let summary = coordinator.run_ingest().await?;
        summary.log_summary();

        println!();
        print_stage_summary(&summary);

        Ok(stage_exit_code(&summary))
    }
}
