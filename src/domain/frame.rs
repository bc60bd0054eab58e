//! Tabular frame model
//!
//! Every pipeline stage trades in [`Frame`]: an ordered set of named columns
//! over rows of JSON values. A frame is what a fetch flattens resources into,
//! what a snapshot file stores, and what a relational table holds. Cells are
//! `serde_json::Value` so a column can carry scalars, nulls, or nested
//! structures until the bronze loader serializes the nested ones to JSON text.

use crate::domain::{FhirLakeError, Result};
use serde_json::Value;

/// One flattened resource: an ordered list of (field name, value) pairs
///
/// Order is significant — it becomes the column order of the frame built
/// from a batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(String, Value)>,
}

impl FlatRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field; a missing source field should be inserted as `Value::Null`
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Field pairs in insertion order
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Value for a field name, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// An ordered, named-column table of JSON values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Creates an empty frame with the given column set
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a frame from flattened records, preserving record order
    ///
    /// Columns are the union of all field names in first-seen order; a record
    /// missing a column contributes null for it.
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for (name, _) in record.fields() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order; each row has one value per column
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the frame has no columns at all
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Appends a row after checking its arity against the column set
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(FhirLakeError::Other(format!(
                "Row arity mismatch: expected {} values, got {}",
                self.columns.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Rewrites every column name through `f`
    ///
    /// The silver transformer uses this to turn dot-delimited flattened names
    /// into SQL-friendly underscore names.
    pub fn rename_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        for column in &mut self.columns {
            *column = f(column);
        }
    }

    /// Appends any absent expected column filled entirely with null
    ///
    /// Existing column order is preserved; missing columns are appended at the
    /// end in the order given.
    pub fn ensure_columns(&mut self, expected: &[&str]) {
        for name in expected {
            if !self.has_column(name) {
                self.columns.push((*name).to_string());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
            }
        }
    }

    /// Projects the frame onto the given columns, skipping absent ones
    ///
    /// The result's column order follows the projection list, not the source.
    /// Absent columns are silently dropped, never fabricated.
    pub fn select(&self, columns: &[&str]) -> Frame {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();

        let selected_columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let selected_rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Frame {
            columns: selected_columns,
            rows: selected_rows,
        }
    }

    /// Serializes nested values to JSON text, column by column
    ///
    /// A column qualifies when any of its values is a list or a mapping; every
    /// non-null value in a qualifying column is replaced by its JSON-text
    /// serialization (scalars included, so the column stays uniformly text).
    /// Nulls stay null. Other columns are untouched.
    pub fn stringify_nested_columns(&mut self) -> Result<()> {
        for col in 0..self.columns.len() {
            let has_nested = self
                .rows
                .iter()
                .any(|row| row[col].is_array() || row[col].is_object());
            if !has_nested {
                continue;
            }

            for row in &mut self.rows {
                let cell = &mut row[col];
                if !cell.is_null() {
                    *cell = Value::String(serde_json::to_string(cell)?);
                }
            }
        }
        Ok(())
    }

    /// Value at (row, column index)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All values of one column, by name
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}
