//! Fetch-and-land stage
//!
//! Runs the Resource Fetcher and Bronze Writer for a set of resource types:
//! one paginated request per type, flatten, snapshot to Parquet. A fetch or
//! write failure aborts that resource type and is reported; the remaining
//! types still run.

use crate::adapters::fhir::FhirClient;
use crate::config::FhirConfig;
use crate::core::bronze::snapshot::SnapshotWriter;
use crate::core::pipeline::summary::StageSummary;
use crate::domain::{Frame, ResourceType, Result};
use std::time::Instant;

/// Resource types named in the configuration
///
/// Validation has already checked the names parse, so unknown entries are
/// skipped with a warning rather than failing the run.
pub fn configured_resources(config: &FhirConfig) -> Vec<ResourceType> {
    config
        .resource_types
        .iter()
        .filter_map(|name| match name.parse() {
            Ok(rt) => Some(rt),
            Err(e) => {
                tracing::warn!(resource_type = %name, error = %e, "Skipping resource type");
                None
            }
        })
        .collect()
}

/// Fetches resources and lands them as bronze snapshots
pub struct BronzeFetcher {
    client: FhirClient,
    writer: SnapshotWriter,
}

impl BronzeFetcher {
    /// Create a fetcher from FHIR configuration and a bronze root directory
    pub fn new(config: &FhirConfig, bronze_root: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self {
            client: FhirClient::new(config)?,
            writer: SnapshotWriter::new(bronze_root),
        })
    }

    /// Fetch and snapshot every given resource type
    ///
    /// Per-type failures are recorded in the summary; one failing type does
    /// not abort the others.
    pub async fn fetch_all(
        &self,
        resource_types: &[ResourceType],
        limit: usize,
    ) -> StageSummary {
        let start = Instant::now();
        let mut summary = StageSummary::new("fetch");

        for &resource_type in resource_types {
            match self.fetch_one(resource_type, limit).await {
                Ok(Some(rows)) => {
                    summary.record_success(resource_type.as_str(), Some(rows));
                }
                Ok(None) => {
                    // Nothing returned; no snapshot written, not a failure.
                    summary.record_success(resource_type.as_str(), Some(0));
                }
                Err(e) => {
                    tracing::error!(
                        resource_type = %resource_type,
                        error = %e,
                        "Failed to fetch and snapshot resource type"
                    );
                    summary.record_failure(resource_type.as_str(), e.to_string());
                }
            }
        }

        summary.with_duration(start.elapsed())
    }

    /// Fetch one resource type and write its snapshot
    ///
    /// Returns `Ok(None)` when the server returned no entries — an empty
    /// snapshot has no schema to carry, so the write is skipped.
    async fn fetch_one(
        &self,
        resource_type: ResourceType,
        limit: usize,
    ) -> Result<Option<usize>> {
        let records = self.client.fetch_resources(resource_type, limit).await?;

        if records.is_empty() {
            tracing::warn!(
                resource_type = %resource_type,
                "No entries returned; skipping snapshot"
            );
            return Ok(None);
        }

        let frame = Frame::from_records(&records);
        self.writer.write(resource_type, &frame)?;
        Ok(Some(frame.row_count()))
    }
}
