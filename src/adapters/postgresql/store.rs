//! PostgreSQL table store
//!
//! Implements [`TableStore`] over the pooled client. A table replace runs
//! DROP, CREATE, and all inserts inside one transaction so a failed replace
//! leaves the previous table contents intact.
//!
//! Column types are inferred from the frame's values: a column whose
//! non-null values are all booleans becomes BOOLEAN, all numbers becomes
//! DOUBLE PRECISION, anything else becomes TEXT. All columns are nullable.

use crate::adapters::database::TableStore;
use crate::adapters::postgresql::client::PostgresClient;
use crate::domain::{FhirLakeError, Frame, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use serde_json::Value;
use std::sync::Arc;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// Rows per multi-row INSERT statement
const INSERT_CHUNK_ROWS: usize = 100;

/// Inferred SQL type for a frame column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Boolean,
    Double,
    Text,
}

impl ColumnType {
    fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
        }
    }
}

/// A single bind parameter for an inferred column type
#[derive(Debug)]
enum SqlValue {
    Null,
    Bool(bool),
    Double(f64),
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql(ty, out),
            SqlValue::Double(v) => v.to_sql(ty, out),
            SqlValue::Text(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::BOOL || *ty == Type::FLOAT8 || *ty == Type::TEXT || *ty == Type::VARCHAR
    }

    to_sql_checked!();
}

/// PostgreSQL implementation of [`TableStore`]
pub struct PostgresStore {
    client: Arc<PostgresClient>,
}

impl PostgresStore {
    /// Create a new store over a client
    pub fn new(client: PostgresClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl TableStore for PostgresStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn replace_table(&self, name: &str, frame: &Frame) -> Result<()> {
        if frame.is_empty() {
            return Err(FhirLakeError::Database(format!(
                "Cannot create table {name} from a frame with no columns"
            )));
        }

        let column_types: Vec<ColumnType> = (0..frame.column_count())
            .map(|col| infer_column_type(frame, col))
            .collect();

        let column_defs: Vec<String> = frame
            .columns()
            .iter()
            .zip(&column_types)
            .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sql_name()))
            .collect();

        let mut client = self.client.get_connection().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| FhirLakeError::Database(format!("Failed to begin transaction: {e}")))?;

        tx.batch_execute(&format!(
            "SET LOCAL statement_timeout = {}",
            self.client.statement_timeout().as_millis()
        ))
        .await
        .map_err(|e| FhirLakeError::Database(format!("Failed to set statement timeout: {e}")))?;

        tx.batch_execute(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({defs})",
            table = quote_ident(name),
            defs = column_defs.join(", ")
        ))
        .await
        .map_err(|e| FhirLakeError::Database(format!("Failed to create table {name}: {e}")))?;

        for chunk in frame.rows().chunks(INSERT_CHUNK_ROWS) {
            let mut values: Vec<SqlValue> = Vec::with_capacity(chunk.len() * column_types.len());
            let mut placeholders: Vec<String> = Vec::with_capacity(chunk.len());

            for (row_idx, row) in chunk.iter().enumerate() {
                let base = row_idx * column_types.len();
                let row_placeholders: Vec<String> = (0..column_types.len())
                    .map(|col_idx| format!("${}", base + col_idx + 1))
                    .collect();
                placeholders.push(format!("({})", row_placeholders.join(", ")));

                for (cell, ty) in row.iter().zip(&column_types) {
                    values.push(bind_value(cell, *ty));
                }
            }

            let statement = format!(
                "INSERT INTO {} ({}) VALUES {}",
                quote_ident(name),
                frame
                    .columns()
                    .iter()
                    .map(|c| quote_ident(c))
                    .collect::<Vec<_>>()
                    .join(", "),
                placeholders.join(", ")
            );

            let params: Vec<&(dyn ToSql + Sync)> = values
                .iter()
                .map(|v| v as &(dyn ToSql + Sync))
                .collect();

            tx.execute(&statement, &params).await.map_err(|e| {
                FhirLakeError::Database(format!("Failed to insert into {name}: {e}"))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| FhirLakeError::Database(format!("Failed to commit replace of {name}: {e}")))?;

        Ok(())
    }

    async fn read_table(&self, name: &str) -> Result<Frame> {
        let client = self.client.get_connection().await?;

        let statement = client
            .prepare(&format!("SELECT * FROM {}", quote_ident(name)))
            .await
            .map_err(|e| FhirLakeError::Database(format!("Failed to read table {name}: {e}")))?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = client
            .query(&statement, &[])
            .await
            .map_err(|e| FhirLakeError::Database(format!("Failed to read table {name}: {e}")))?;

        let mut frame = Frame::new(columns);
        for row in rows {
            let mut values = Vec::with_capacity(row.len());
            for (idx, column) in row.columns().iter().enumerate() {
                values.push(read_cell(&row, idx, column.type_(), name)?);
            }
            frame.push_row(values)?;
        }

        Ok(frame)
    }
}

/// Infer the SQL type for one column from its values
fn infer_column_type(frame: &Frame, col: usize) -> ColumnType {
    let mut saw_bool = false;
    let mut saw_number = false;
    let mut saw_other = false;

    for row in frame.rows() {
        match &row[col] {
            Value::Null => {}
            Value::Bool(_) => saw_bool = true,
            Value::Number(_) => saw_number = true,
            _ => saw_other = true,
        }
    }

    if saw_bool && !saw_number && !saw_other {
        ColumnType::Boolean
    } else if saw_number && !saw_bool && !saw_other {
        ColumnType::Double
    } else {
        ColumnType::Text
    }
}

/// Convert a JSON cell into a bind parameter for its column type
fn bind_value(cell: &Value, ty: ColumnType) -> SqlValue {
    match (ty, cell) {
        (_, Value::Null) => SqlValue::Null,
        (ColumnType::Boolean, Value::Bool(b)) => SqlValue::Bool(*b),
        (ColumnType::Double, Value::Number(n)) => {
            n.as_f64().map(SqlValue::Double).unwrap_or(SqlValue::Null)
        }
        (ColumnType::Text, Value::String(s)) => SqlValue::Text(s.clone()),
        // Mixed-type columns degrade to their text rendering.
        (ColumnType::Text, other) => SqlValue::Text(other.to_string()),
        // Unreachable under inference, but never panic on data.
        (_, other) => SqlValue::Text(other.to_string()),
    }
}

/// Read one cell back into a JSON value based on the column's SQL type
fn read_cell(
    row: &tokio_postgres::Row,
    idx: usize,
    ty: &Type,
    table: &str,
) -> Result<Value> {
    let value = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)
            .map(|v| v.map(Value::Bool))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx).map(|v| {
            v.and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        })
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx).map(|v| {
            v.and_then(|f| serde_json::Number::from_f64(f as f64))
                .map(Value::Number)
        })
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map(|v| v.map(|n| Value::Number(n.into())))
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map(|v| v.map(|n| Value::Number(n.into())))
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)
            .map(|v| v.map(|n| Value::Number(n.into())))
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR {
        row.try_get::<_, Option<String>>(idx)
            .map(|v| v.map(Value::String))
    } else {
        return Err(FhirLakeError::Database(format!(
            "Unsupported column type {ty} in table {table}"
        )));
    };

    value
        .map(|v| v.unwrap_or(Value::Null))
        .map_err(|e| FhirLakeError::Database(format!("Failed to decode row from {table}: {e}")))
}

/// Double-quote an identifier for safe interpolation into DDL/DML
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame_with_column(values: Vec<Value>) -> Frame {
        let mut frame = Frame::new(vec!["c".to_string()]);
        for v in values {
            frame.push_row(vec![v]).unwrap();
        }
        frame
    }

    #[test]
    fn test_infer_boolean_column() {
        let frame = frame_with_column(vec![json!(true), json!(null), json!(false)]);
        assert_eq!(infer_column_type(&frame, 0), ColumnType::Boolean);
    }

    #[test]
    fn test_infer_double_column() {
        let frame = frame_with_column(vec![json!(1), json!(2.5), json!(null)]);
        assert_eq!(infer_column_type(&frame, 0), ColumnType::Double);
    }

    #[test]
    fn test_infer_text_for_strings_and_mixed() {
        let frame = frame_with_column(vec![json!("a"), json!(null)]);
        assert_eq!(infer_column_type(&frame, 0), ColumnType::Text);

        let mixed = frame_with_column(vec![json!("a"), json!(1)]);
        assert_eq!(infer_column_type(&mixed, 0), ColumnType::Text);
    }

    #[test]
    fn test_all_null_column_defaults_to_text() {
        let frame = frame_with_column(vec![json!(null), json!(null)]);
        assert_eq!(infer_column_type(&frame, 0), ColumnType::Text);
    }

    #[test]
    fn test_bind_value_mixed_column_renders_text() {
        assert!(matches!(
            bind_value(&json!(true), ColumnType::Text),
            SqlValue::Text(s) if s == "true"
        ));
        assert!(matches!(
            bind_value(&json!(null), ColumnType::Text),
            SqlValue::Null
        ));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("birthDate"), "\"birthDate\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
