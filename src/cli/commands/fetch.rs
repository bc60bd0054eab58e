//! Fetch command implementation
//!
//! This module implements the `fetch` command: fetch FHIR resources and
//! land them as bronze Parquet snapshots. The command needs no database
//! connection.

use crate::cli::commands::{print_stage_summary, stage_exit_code};
use crate::config::load_config;
use crate::core::bronze::fetcher::{configured_resources, BronzeFetcher};
use crate::domain::ResourceType;
use clap::Args;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Fetch a single resource type instead of all configured types
    #[arg(short, long)]
    pub resource: Option<String>,

    /// Override the per-fetch row-count limit
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl FetchArgs {
    /// Execute the fetch command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting fetch command");

        let config = load_config(config_path)?;

        let resources: Vec<ResourceType> = match &self.resource {
            Some(name) => match name.parse() {
                Ok(rt) => vec![rt],
                Err(e) => {
                    eprintln!("Invalid resource type: {e}");
                    return Ok(2);
                }
            },
            None => configured_resources(&config.fhir),
        };

        let limit = self.limit.unwrap_or(config.fhir.page_size);

        println!(
            "📥 Fetching {} resource type(s) from {} (limit {})",
            resources.len(),
            config.fhir.base_url,
            limit
        );

        let fetcher = BronzeFetcher::new(&config.fhir, &config.bronze.root_dir)?;
        let summary = fetcher.fetch_all(&resources, limit).await;
        summary.log_summary();

        println!();
        print_stage_summary(&summary);

        Ok(stage_exit_code(&summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_args_defaults() {
        let args = FetchArgs {
            resource: None,
            limit: None,
        };

        assert!(args.resource.is_none());
        assert!(args.limit.is_none());
    }
}
