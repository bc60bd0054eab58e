//! Database abstraction traits
//!
//! This module defines the storage trait the pipeline stages consume. The
//! pipeline only ever needs two operations from the relational store:
//! replace-create a table from a frame, and read a table back in full.

use crate::domain::{Frame, Result};
use async_trait::async_trait;

/// Relational table store
///
/// Every table-producing stage writes through `replace_table` and every
/// table-consuming stage reads through `read_table`. Replace semantics are
/// all-or-nothing: after a successful call the table holds exactly the
/// frame's contents, and a failed call leaves the previous contents intact.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Test connectivity to the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Drop-and-recreate a table from the frame's columns and rows
    ///
    /// # Arguments
    ///
    /// * `name` - Target table name
    /// * `frame` - Tabular contents; column types are inferred from values
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be replaced. The frame must have
    /// at least one column.
    async fn replace_table(&self, name: &str, frame: &Frame) -> Result<()>;

    /// Read a table in full, preserving column order and nulls
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or cannot be read.
    async fn read_table(&self, name: &str) -> Result<Frame>;
}
