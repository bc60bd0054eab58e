//! Star-schema layer: dimension and fact tables
//!
//! The builder reads the four silver tables in full and projects fixed
//! column subsets into dimension tables (descriptive attributes, one row per
//! entity) and fact tables (reference columns only, one row per record).
//! Projections intersect with the columns actually present — an absent
//! optional column is dropped from the projection, never fabricated.
//!
//! There is no join logic; cross-entity analytics happen at query time in
//! the consuming dashboard.

use crate::adapters::database::TableStore;
use crate::core::pipeline::summary::StageSummary;
use crate::domain::{Frame, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// One projection from a silver table into a dimension or fact table
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub source: &'static str,
    pub target: &'static str,
    pub columns: &'static [&'static str],
}

/// Columns of `dim_patient`
pub const DIM_PATIENT_COLUMNS: &[&str] =
    &["id", "name", "gender", "birthDate", "identifier", "address"];

/// Columns of `dim_practitioner`
pub const DIM_PRACTITIONER_COLUMNS: &[&str] = &[
    "id",
    "identifier",
    "name",
    "active",
    "telecom",
    "address",
    "gender",
    "qualification",
];

/// Columns of `dim_condition`
pub const DIM_CONDITION_COLUMNS: &[&str] = &[
    "id",
    "code_coding",
    "clinicalStatus_coding",
    "severity_coding",
    "onsetDateTime",
    "abatementDateTime",
];

/// Columns of `dim_observation`
pub const DIM_OBSERVATION_COLUMNS: &[&str] = &[
    "id",
    "code_coding",
    "valueQuantity_value",
    "valueQuantity_unit",
    "valueQuantity_system",
    "valueQuantity_code",
    "subject_reference",
];

/// Columns of `fact_condition` — foreign keys only
pub const FACT_CONDITION_COLUMNS: &[&str] = &[
    "id",
    "subject_reference",
    "asserter_reference",
    "encounter_reference",
];

/// All star-schema projections, dimensions first
pub const PROJECTIONS: &[Projection] = &[
    Projection {
        source: "silver_patient",
        target: "dim_patient",
        columns: DIM_PATIENT_COLUMNS,
    },
    Projection {
        source: "silver_practitioner",
        target: "dim_practitioner",
        columns: DIM_PRACTITIONER_COLUMNS,
    },
    Projection {
        source: "silver_condition",
        target: "dim_condition",
        columns: DIM_CONDITION_COLUMNS,
    },
    Projection {
        source: "silver_observation",
        target: "dim_observation",
        columns: DIM_OBSERVATION_COLUMNS,
    },
    Projection {
        source: "silver_condition",
        target: "fact_condition",
        columns: FACT_CONDITION_COLUMNS,
    },
];

/// Builds the dimension and fact tables from the silver layer
pub struct StarSchemaBuilder {
    store: Arc<dyn TableStore>,
}

impl StarSchemaBuilder {
    /// Create a builder over a table store
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Build every projection
    ///
    /// Each silver source is read once and reused across its projections.
    /// Failures propagate — a missing silver table or a failed replace aborts
    /// the stage.
    pub async fn build_all(&self) -> Result<StageSummary> {
        let start = Instant::now();
        let mut summary = StageSummary::new("star-build");

        let mut sources: HashMap<&'static str, Frame> = HashMap::new();
        for projection in PROJECTIONS {
            if !sources.contains_key(projection.source) {
                let frame = self.store.read_table(projection.source).await?;
                tracing::info!(
                    table = projection.source,
                    rows = frame.row_count(),
                    "Loaded silver table"
                );
                sources.insert(projection.source, frame);
            }
        }

        for projection in PROJECTIONS {
            let source = &sources[projection.source];
            let projected = source.select(projection.columns);

            self.store
                .replace_table(projection.target, &projected)
                .await?;

            tracing::info!(
                table = projection.target,
                rows = projected.row_count(),
                "Star table replaced"
            );
            summary.record_success(projection.target, Some(projected.row_count()));
        }

        Ok(summary.with_duration(start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_targets() {
        let targets: Vec<&str> = PROJECTIONS.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec![
                "dim_patient",
                "dim_practitioner",
                "dim_condition",
                "dim_observation",
                "fact_condition"
            ]
        );
    }

    #[test]
    fn test_fact_condition_is_references_only() {
        for column in FACT_CONDITION_COLUMNS {
            assert!(
                *column == "id" || column.ends_with("_reference"),
                "{column} is not a reference column"
            );
        }
    }

    #[test]
    fn test_fact_projection_drops_absent_reference() {
        let mut silver = Frame::new(vec![
            "id".to_string(),
            "subject_reference".to_string(),
            "asserter_reference".to_string(),
            "code_coding".to_string(),
        ]);
        silver
            .push_row(vec![
                json!("c1"),
                json!("Patient/p1"),
                json!(null),
                json!("[]"),
            ])
            .unwrap();

        let fact = silver.select(FACT_CONDITION_COLUMNS);

        // encounter_reference is absent from the source, so it is absent
        // from the fact table too — dropped, not fabricated.
        assert_eq!(
            fact.columns(),
            &["id", "subject_reference", "asserter_reference"]
        );
    }

    #[test]
    fn test_dim_projection_is_contained_in_source() {
        let silver = Frame::new(vec![
            "id".to_string(),
            "gender".to_string(),
            "birthDate".to_string(),
        ]);
        let dim = silver.select(DIM_PATIENT_COLUMNS);

        for column in dim.columns() {
            assert!(silver.has_column(column));
        }
    }
}
