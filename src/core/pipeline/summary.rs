//! Stage and run summaries
//!
//! This module defines structures for tracking and reporting per-item
//! outcomes of each pipeline stage.

use std::time::Duration;

/// Outcome of one processed item (a resource type, a file, a table)
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// Item label (e.g. a table or file name)
    pub item: String,

    /// Row count, when the item produced a table
    pub rows: Option<usize>,

    /// Error message when the item failed
    pub error: Option<String>,
}

/// Summary of one pipeline stage
#[derive(Debug, Clone)]
pub struct StageSummary {
    /// Stage name (fetch, bronze-load, silver-transform, star-build)
    pub stage: &'static str,

    /// Per-item outcomes in processing order
    pub items: Vec<ItemOutcome>,

    /// Duration of the stage
    pub duration: Duration,
}

impl StageSummary {
    /// Create a new empty stage summary
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            items: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a successfully processed item
    pub fn record_success(&mut self, item: impl Into<String>, rows: Option<usize>) {
        self.items.push(ItemOutcome {
            item: item.into(),
            rows,
            error: None,
        });
    }

    /// Record a failed item
    pub fn record_failure(&mut self, item: impl Into<String>, error: impl Into<String>) {
        self.items.push(ItemOutcome {
            item: item.into(),
            rows: None,
            error: Some(error.into()),
        });
    }

    /// Number of items that succeeded
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.error.is_none()).count()
    }

    /// Number of items that failed
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.error.is_some()).count()
    }

    /// Check if the stage completed without failures
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            stage = self.stage,
            items = self.items.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            duration_ms = self.duration.as_millis(),
            "Stage completed"
        );

        for item in &self.items {
            if let Some(error) = &item.error {
                tracing::warn!(
                    stage = self.stage,
                    item = %item.item,
                    error = %error,
                    "Stage item failed"
                );
            }
        }
    }
}

/// Summary of a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Stage summaries in execution order
    pub stages: Vec<StageSummary>,

    /// Total run duration
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Append a stage summary
    pub fn add_stage(&mut self, stage: StageSummary) {
        self.stages.push(stage);
    }

    /// Check if every stage completed without failures
    pub fn is_successful(&self) -> bool {
        self.stages.iter().all(StageSummary::is_successful)
    }

    /// Log the run summary
    pub fn log_summary(&self) {
        tracing::info!(
            stages = self.stages.len(),
            duration_secs = self.duration.as_secs(),
            successful = self.is_successful(),
            "Pipeline run completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_summary_counts() {
        let mut summary = StageSummary::new("bronze-load");
        summary.record_success("bronze_patient", Some(50));
        summary.record_success("bronze_condition", Some(12));
        summary.record_failure("bronze_observation", "corrupt file");

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_stage_summary_empty_is_successful() {
        let summary = StageSummary::new("fetch");
        assert!(summary.is_successful());
        assert_eq!(summary.items.len(), 0);
    }

    #[test]
    fn test_stage_summary_with_duration() {
        let summary = StageSummary::new("fetch").with_duration(Duration::from_secs(3));
        assert_eq!(summary.duration, Duration::from_secs(3));
    }

    #[test]
    fn test_run_summary_aggregates_stages() {
        let mut run = RunSummary::new();

        let mut ok_stage = StageSummary::new("fetch");
        ok_stage.record_success("Patient", Some(2));
        run.add_stage(ok_stage);

        assert!(run.is_successful());

        let mut bad_stage = StageSummary::new("bronze-load");
        bad_stage.record_failure("bronze_patient", "boom");
        run.add_stage(bad_stage);

        assert!(!run.is_successful());
    }
}
