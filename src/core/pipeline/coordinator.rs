//! Pipeline coordinator
//!
//! Wires configuration into the stage objects and drives a full run:
//! fetch → bronze load → silver transform → star build. Each stage runs to
//! completion before the next begins; the snapshot files and tables are the
//! only coordination between stages.

use crate::adapters::database::TableStore;
use crate::adapters::postgresql::{PostgresClient, PostgresStore};
use crate::config::FhirLakeConfig;
use crate::core::bronze::fetcher::{configured_resources, BronzeFetcher};
use crate::core::bronze::BronzeLoader;
use crate::core::pipeline::summary::{RunSummary, StageSummary};
use crate::core::silver::SilverTransformer;
use crate::core::star::StarSchemaBuilder;
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Pipeline coordinator
pub struct PipelineCoordinator {
    config: FhirLakeConfig,
    store: Arc<dyn TableStore>,
}

impl PipelineCoordinator {
    /// Create a coordinator, connecting to PostgreSQL
    ///
    /// The connection is verified up front so store connectivity failures
    /// surface before any stage runs.
    pub async fn new(config: FhirLakeConfig) -> Result<Self> {
        let client = PostgresClient::new(config.postgres.clone())?;
        tracing::info!(
            postgres = %client.connection_string_safe(),
            "Connecting to PostgreSQL"
        );

        let store = Arc::new(PostgresStore::new(client));
        store.test_connection().await?;

        Ok(Self { config, store })
    }

    /// Run the fetch stage for the configured resource types
    pub async fn run_fetch(&self, limit: usize) -> Result<StageSummary> {
        let fetcher = BronzeFetcher::new(&self.config.fhir, &self.config.bronze.root_dir)?;
        let resources = configured_resources(&self.config.fhir);
        Ok(fetcher.fetch_all(&resources, limit).await)
    }

    /// Run the bronze load stage
    pub async fn run_ingest(&self) -> Result<StageSummary> {
        BronzeLoader::new(&self.config.bronze.root_dir, self.store.clone())
            .load_all()
            .await
    }

    /// Run the silver transform stage
    pub async fn run_transform(&self) -> Result<StageSummary> {
        SilverTransformer::new(self.store.clone()).transform_all().await
    }

    /// Run the star-schema build stage
    pub async fn run_model(&self) -> Result<StageSummary> {
        StarSchemaBuilder::new(self.store.clone()).build_all().await
    }

    /// Execute the full pipeline in order
    ///
    /// Item-level failures inside a stage are carried in that stage's
    /// summary; only fatal errors (store connectivity, a failed star build)
    /// abort the run.
    pub async fn execute_run(&self, limit: usize) -> Result<RunSummary> {
        let start = Instant::now();
        let mut run = RunSummary::new();

        tracing::info!("Starting pipeline run");

        let fetch = self.run_fetch(limit).await?;
        fetch.log_summary();
        run.add_stage(fetch);

        let ingest = self.run_ingest().await?;
        ingest.log_summary();
        run.add_stage(ingest);

        let transform = self.run_transform().await?;
        transform.log_summary();
        run.add_stage(transform);

        let model = self.run_model().await?;
        model.log_summary();
        run.add_stage(model);

        let run = run.with_duration(start.elapsed());
        run.log_summary();
        Ok(run)
    }
}
