//! Bronze snapshot files
//!
//! One snapshot is one fetch's flattened output for one resource type,
//! written as a Parquet file named `{resource}_{YYYYMMDDHHMMSS}.parquet`
//! inside a resource-specific subfolder of the bronze root. Snapshots are
//! never mutated or merged; multiple snapshots per resource type coexist
//! until a load run replaces the bronze table from them.
//!
//! The Arrow schema is inferred from the flattened JSON rows, so nested
//! fields (lists, mappings) land in Parquet as native nested types and come
//! back out as JSON values on read.

use crate::domain::{FhirLakeError, Frame, ResourceType, Result};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::writer::JsonArray;
use arrow::json::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;
use chrono::Local;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use regex::Regex;
use serde_json::Value;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extension for bronze snapshots
pub const SNAPSHOT_EXTENSION: &str = "parquet";

/// Writes snapshot files beneath a bronze root directory
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer rooted at the bronze directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write one snapshot for a resource type, returning the file path
    ///
    /// The resource subfolder is created if absent. The file name carries a
    /// second-resolution timestamp, so two writes within the same second for
    /// the same resource type would collide; callers run one fetch per
    /// resource type per run.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame has no rows (there is no schema to
    /// infer) or when encoding/writing fails. Write errors propagate; there
    /// is no retry.
    pub fn write(&self, resource_type: ResourceType, frame: &Frame) -> Result<PathBuf> {
        if frame.row_count() == 0 {
            return Err(FhirLakeError::Snapshot(format!(
                "No rows to snapshot for {resource_type}"
            )));
        }

        let dir = self.root.join(resource_type.stem());
        fs::create_dir_all(&dir)?;

        let file_name = format!(
            "{}_{}.{}",
            resource_type.stem(),
            Local::now().format("%Y%m%d%H%M%S"),
            SNAPSHOT_EXTENSION
        );
        let path = dir.join(file_name);

        let batch = frame_to_record_batch(frame)?;
        let file = File::create(&path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;

        tracing::info!(
            resource_type = %resource_type,
            path = %path.display(),
            rows = frame.row_count(),
            "Snapshot written"
        );

        Ok(path)
    }
}

/// Read a snapshot file back into a frame
///
/// Column order follows the file's schema; nulls stay null; nested Parquet
/// values come back as JSON lists/mappings.
pub fn read_snapshot(path: &Path) -> Result<Frame> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let reader = builder.build()?;
    let mut frame = Frame::new(columns.clone());

    for batch in reader {
        let batch = batch?;
        for row in record_batch_to_json_rows(&batch)? {
            let values = columns
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                .collect();
            frame.push_row(values)?;
        }
    }

    Ok(frame)
}

/// Derive a bronze table name from a snapshot file name
///
/// Strips the extension and the trailing timestamp suffix (a run of 8+
/// digits, optionally followed by an underscore-separated 6-digit time
/// part), lowercases the remainder, and prefixes `bronze_`:
/// `patient_20240101120000.parquet` → `bronze_patient`.
pub fn derive_table_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let re = Regex::new(r"_\d{8,}(_\d{6})?$").unwrap();
    let cleaned = re.replace(stem, "");
    format!("bronze_{}", cleaned.to_lowercase())
}

/// Encode a frame as a single Arrow record batch
///
/// The schema is inferred from the rows and then reordered to the frame's
/// column order. Columns whose values are all null infer as the Null type,
/// which Parquet cannot carry; those are widened to nullable Utf8.
fn frame_to_record_batch(frame: &Frame) -> Result<RecordBatch> {
    let values: Vec<Value> = frame
        .rows()
        .iter()
        .map(|row| {
            let mut map = serde_json::Map::new();
            for (column, value) in frame.columns().iter().zip(row) {
                map.insert(column.clone(), value.clone());
            }
            Value::Object(map)
        })
        .collect();

    let inferred = infer_json_schema_from_iterator(values.iter().map(|v| Ok(v.clone())))?;

    let mut fields: Vec<Field> = Vec::with_capacity(frame.column_count());
    for name in frame.columns() {
        let field = inferred
            .field_with_name(name)
            .map_err(|e| FhirLakeError::Snapshot(e.to_string()))?
            .clone();
        if field.data_type() == &DataType::Null {
            fields.push(Field::new(name.as_str(), DataType::Utf8, true));
        } else {
            fields.push(field);
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let mut decoder = ReaderBuilder::new(schema).build_decoder()?;
    decoder.serialize(&values)?;

    decoder
        .flush()?
        .ok_or_else(|| FhirLakeError::Snapshot("No rows decoded for snapshot".to_string()))
}

/// Decode a record batch into JSON row objects, keeping explicit nulls
fn record_batch_to_json_rows(
    batch: &RecordBatch,
) -> Result<Vec<serde_json::Map<String, Value>>> {
    let mut buf = Vec::new();
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(&mut buf);
    writer.write(batch)?;
    writer.finish()?;
    drop(writer);

    Ok(serde_json::from_slice(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("patient_20240101120000.parquet", "bronze_patient"; "compact timestamp")]
    #[test_case("patient_20240101_120000.parquet", "bronze_patient"; "underscore timestamp")]
    #[test_case("Observation_20231130093000.parquet", "bronze_observation"; "lowercased")]
    #[test_case("practitioner.parquet", "bronze_practitioner"; "no timestamp")]
    #[test_case("encounter_v2_20240101120000.parquet", "bronze_encounter_v2"; "inner underscore kept")]
    fn test_derive_table_name(file_name: &str, expected: &str) {
        assert_eq!(derive_table_name(file_name), expected);
    }

    fn sample_frame() -> Frame {
        let mut frame = Frame::new(vec![
            "id".to_string(),
            "birthDate".to_string(),
            "active".to_string(),
            "address".to_string(),
        ]);
        frame
            .push_row(vec![
                json!("p1"),
                json!("1990-01-01"),
                json!(true),
                json!([{"city": "Berlin", "line": ["Unter den Linden 1"]}]),
            ])
            .unwrap();
        frame
            .push_row(vec![json!("p2"), json!(null), json!(null), json!(null)])
            .unwrap();
        frame
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(dir.path());

        let frame = sample_frame();
        let path = writer.write(ResourceType::Patient, &frame).unwrap();

        assert!(path.starts_with(dir.path().join("patient")));
        assert_eq!(path.extension().unwrap(), SNAPSHOT_EXTENSION);

        let read = read_snapshot(&path).unwrap();
        assert_eq!(read.columns(), frame.columns());
        assert_eq!(read.row_count(), 2);
        assert_eq!(read.cell(0, 0), Some(&json!("p1")));
        assert_eq!(read.cell(1, 1), Some(&Value::Null));
        // Nested values survive as JSON structures.
        let address = read.cell(0, 3).unwrap();
        assert_eq!(address[0]["city"], json!("Berlin"));
    }

    #[test]
    fn test_all_null_column_round_trips_as_null() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(dir.path());

        let mut frame = Frame::new(vec!["id".to_string(), "gender".to_string()]);
        frame.push_row(vec![json!("p1"), json!(null)]).unwrap();
        frame.push_row(vec![json!("p2"), json!(null)]).unwrap();

        let path = writer.write(ResourceType::Patient, &frame).unwrap();
        let read = read_snapshot(&path).unwrap();

        assert_eq!(read.columns(), &["id", "gender"]);
        assert_eq!(read.cell(0, 1), Some(&Value::Null));
        assert_eq!(read.cell(1, 1), Some(&Value::Null));
    }

    #[test]
    fn test_write_empty_frame_is_an_error() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let frame = Frame::new(vec!["id".to_string()]);

        assert!(writer.write(ResourceType::Patient, &frame).is_err());
    }

    #[test]
    fn test_file_name_carries_timestamp() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::new(dir.path());

        let path = writer
            .write(ResourceType::Condition, &{
                let mut f = Frame::new(vec!["id".to_string()]);
                f.push_row(vec![json!("c1")]).unwrap();
                f
            })
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("condition_"));
        // The derived table name round-trips back to the resource stem.
        assert_eq!(derive_table_name(name), "bronze_condition");
    }
}
