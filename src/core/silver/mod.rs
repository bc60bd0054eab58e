//! Silver layer: cleaned, schema-complete tables
//!
//! The silver transformer reads each bronze table, rewrites dot-delimited
//! flattened column names to underscore form, backfills the table's expected
//! columns with nulls, and replace-creates the silver table. Each table's
//! expected schema is an explicit named constant rather than an implicit
//! property of whatever columns happened to arrive.

use crate::adapters::database::TableStore;
use crate::core::pipeline::summary::StageSummary;
use crate::domain::{Frame, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Declared kind for an expected silver column
///
/// Kinds are validated permissively: a mismatch logs a warning and the value
/// passes through unchanged. The pipeline absorbs schema gaps, it does not
/// reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Boolean scalar
    Bool,
    /// Numeric scalar
    Number,
    /// Text scalar
    Text,
    /// JSON-text serialized nested structure
    Json,
}

impl ColumnKind {
    /// Whether a non-null value matches the declared kind
    fn matches(&self, value: &Value) -> bool {
        match self {
            ColumnKind::Bool => value.is_boolean(),
            ColumnKind::Number => value.is_number(),
            ColumnKind::Text => value.is_string(),
            // Nested columns arrive as JSON text after bronze loading, but a
            // frame that skipped that step may still hold the structure.
            ColumnKind::Json => value.is_string() || value.is_array() || value.is_object(),
        }
    }
}

/// One expected silver column: name and declared kind
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

/// One bronze → silver table pair with its expected columns
#[derive(Debug, Clone, Copy)]
pub struct TablePair {
    pub bronze: &'static str,
    pub silver: &'static str,
    pub expected: &'static [ColumnSpec],
}

/// Expected columns of `silver_patient`
pub const SILVER_PATIENT_COLUMNS: &[ColumnSpec] = &[
    col("telecom", ColumnKind::Json),
    col("address", ColumnKind::Json),
    col("identifier", ColumnKind::Json),
    col("gender", ColumnKind::Text),
    col("birthDate", ColumnKind::Text),
    col("deceasedBoolean", ColumnKind::Bool),
];

/// Expected columns of `silver_practitioner`
pub const SILVER_PRACTITIONER_COLUMNS: &[ColumnSpec] = &[
    col("telecom", ColumnKind::Json),
    col("address", ColumnKind::Json),
    col("identifier", ColumnKind::Json),
    col("active", ColumnKind::Bool),
    col("gender", ColumnKind::Text),
    col("qualification", ColumnKind::Json),
];

/// Expected columns of `silver_condition`
pub const SILVER_CONDITION_COLUMNS: &[ColumnSpec] = &[
    col("subject_reference", ColumnKind::Text),
    col("code_coding", ColumnKind::Json),
    col("clinicalStatus_coding", ColumnKind::Json),
    col("code_text", ColumnKind::Text),
    col("onsetDateTime", ColumnKind::Text),
];

/// Expected columns of `silver_observation`
pub const SILVER_OBSERVATION_COLUMNS: &[ColumnSpec] = &[
    col("subject_reference", ColumnKind::Text),
    col("code_coding", ColumnKind::Json),
    col("valueQuantity_value", ColumnKind::Number),
    col("valueQuantity_unit", ColumnKind::Text),
    col("status", ColumnKind::Text),
];

/// The fixed bronze → silver mapping
pub const TABLE_PAIRS: &[TablePair] = &[
    TablePair {
        bronze: "bronze_patient",
        silver: "silver_patient",
        expected: SILVER_PATIENT_COLUMNS,
    },
    TablePair {
        bronze: "bronze_practitioner",
        silver: "silver_practitioner",
        expected: SILVER_PRACTITIONER_COLUMNS,
    },
    TablePair {
        bronze: "bronze_condition",
        silver: "silver_condition",
        expected: SILVER_CONDITION_COLUMNS,
    },
    TablePair {
        bronze: "bronze_observation",
        silver: "silver_observation",
        expected: SILVER_OBSERVATION_COLUMNS,
    },
];

/// Transforms bronze tables into silver tables
pub struct SilverTransformer {
    store: Arc<dyn TableStore>,
}

impl SilverTransformer {
    /// Create a transformer over a table store
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Transform every pair in the fixed mapping, isolating per-pair failures
    pub async fn transform_all(&self) -> Result<StageSummary> {
        let start = Instant::now();
        let mut summary = StageSummary::new("silver-transform");

        for pair in TABLE_PAIRS {
            tracing::info!(
                bronze = pair.bronze,
                silver = pair.silver,
                "Transforming table"
            );

            match self.transform_one(pair).await {
                Ok(rows) => {
                    tracing::info!(silver = pair.silver, rows = rows, "Silver table replaced");
                    summary.record_success(pair.silver, Some(rows));
                }
                Err(e) => {
                    tracing::error!(
                        bronze = pair.bronze,
                        silver = pair.silver,
                        error = %e,
                        "Failed to transform table"
                    );
                    summary.record_failure(pair.silver, e.to_string());
                }
            }
        }

        Ok(summary.with_duration(start.elapsed()))
    }

    async fn transform_one(&self, pair: &TablePair) -> Result<usize> {
        let mut frame = self.store.read_table(pair.bronze).await?;

        transform_frame(&mut frame, pair.expected);
        warn_on_kind_mismatches(&frame, pair);

        self.store.replace_table(pair.silver, &frame).await?;
        Ok(frame.row_count())
    }
}

/// The pure column transformation: rename then backfill
///
/// Dot-delimited flattened names become underscore names, and any absent
/// expected column is appended filled with nulls, in list order.
pub fn transform_frame(frame: &mut Frame, expected: &[ColumnSpec]) {
    frame.rename_columns(|c| c.replace('.', "_"));

    let expected_names: Vec<&str> = expected.iter().map(|spec| spec.name).collect();
    frame.ensure_columns(&expected_names);
}

/// Log a warning per expected column whose values disagree with its kind
fn warn_on_kind_mismatches(frame: &Frame, pair: &TablePair) {
    for spec in pair.expected {
        let Some(values) = frame.column_values(spec.name) else {
            continue;
        };

        let mismatches = values
            .iter()
            .filter(|v| !v.is_null() && !spec.kind.matches(v))
            .count();

        if mismatches > 0 {
            tracing::warn!(
                silver = pair.silver,
                column = spec.name,
                kind = ?spec.kind,
                mismatches = mismatches,
                "Column values disagree with declared kind"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_frame_renames_dots() {
        let mut frame = Frame::new(vec!["id".to_string(), "code.coding".to_string()]);
        frame.push_row(vec![json!("c1"), json!("[]")]).unwrap();

        transform_frame(&mut frame, SILVER_CONDITION_COLUMNS);

        assert!(frame.has_column("code_coding"));
        assert!(!frame.has_column("code.coding"));
    }

    #[test]
    fn test_transform_frame_backfills_missing_columns() {
        let mut frame = Frame::new(vec!["id".to_string(), "gender".to_string()]);
        frame.push_row(vec![json!("p1"), json!("female")]).unwrap();

        transform_frame(&mut frame, SILVER_PATIENT_COLUMNS);

        // Every expected column is now present.
        for spec in SILVER_PATIENT_COLUMNS {
            assert!(frame.has_column(spec.name), "missing {}", spec.name);
        }
        // The backfilled deceasedBoolean column is entirely null.
        let values = frame.column_values("deceasedBoolean").unwrap();
        assert!(values.iter().all(|v| v.is_null()));
        // Existing column order is preserved, missing ones appended at the end.
        assert_eq!(frame.columns()[0], "id");
        assert_eq!(frame.columns()[1], "gender");
    }

    #[test]
    fn test_transform_frame_keeps_existing_columns_untouched() {
        let mut frame = Frame::new(vec!["gender".to_string()]);
        frame.push_row(vec![json!("other")]).unwrap();

        transform_frame(&mut frame, SILVER_PATIENT_COLUMNS);

        assert_eq!(
            frame.column_values("gender").unwrap(),
            vec![&json!("other")]
        );
    }

    #[test]
    fn test_table_pairs_cover_four_resources() {
        let silvers: Vec<&str> = TABLE_PAIRS.iter().map(|p| p.silver).collect();
        assert_eq!(
            silvers,
            vec![
                "silver_patient",
                "silver_practitioner",
                "silver_condition",
                "silver_observation"
            ]
        );
    }

    #[test]
    fn test_column_kind_matches() {
        assert!(ColumnKind::Bool.matches(&json!(true)));
        assert!(!ColumnKind::Bool.matches(&json!("true")));
        assert!(ColumnKind::Number.matches(&json!(37.5)));
        assert!(ColumnKind::Text.matches(&json!("final")));
        assert!(ColumnKind::Json.matches(&json!("[{\"a\":1}]")));
        assert!(ColumnKind::Json.matches(&json!([1, 2])));
    }
}
