//! Run command implementation
//!
//! This module implements the `run` command: the full pipeline in order —
//! fetch, ingest, transform, model.

use crate::cli::commands::print_stage_summary;
use crate::config::load_config;
use crate::core::pipeline::PipelineCoordinator;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the per-fetch row-count limit
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting pipeline run command");

        let config = load_config(config_path)?;
        let limit = self.limit.unwrap_or(config.fhir.page_size);

        let coordinator = match PipelineCoordinator::new(config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                eprintln!("Failed to connect to PostgreSQL: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("🚀 Starting pipeline run");
        println!();

        let summary = match coordinator.execute_run(limit).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Pipeline run failed");
                eprintln!("Pipeline run failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("📊 Run Summary:");
        for stage in &summary.stages {
            println!("{}:", stage.stage);
            print_stage_summary(stage);
        }
        println!("Total duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if summary.is_successful() {
            println!("✅ Pipeline run completed successfully!");
            Ok(0)
        } else {
            println!("⚠️  Pipeline run completed with failures");
            Ok(1) // Partial success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs { limit: None };
        assert!(args.limit.is_none());
    }
}
