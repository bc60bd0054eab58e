//! Bronze loader stage
//!
//! Scans the snapshot root (including the per-resource subfolders), derives
//! a bronze table name from each file name, serializes nested column values
//! to JSON text, and replace-creates the table. One failing file never
//! aborts the remaining files.
//!
//! Files are processed in sorted name order, so when several snapshots of a
//! resource type coexist the newest timestamp replaces the table last.

use crate::adapters::database::TableStore;
use crate::core::bronze::snapshot::{self, SNAPSHOT_EXTENSION};
use crate::core::pipeline::summary::StageSummary;
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Loads bronze snapshot files into the relational store
pub struct BronzeLoader {
    root: PathBuf,
    store: Arc<dyn TableStore>,
}

impl BronzeLoader {
    /// Create a loader over a snapshot root and a table store
    pub fn new(root: impl Into<PathBuf>, store: Arc<dyn TableStore>) -> Self {
        Self {
            root: root.into(),
            store,
        }
    }

    /// Load every snapshot in the root, isolating per-file failures
    ///
    /// No-op with a message when the root is absent or holds no snapshots.
    pub async fn load_all(&self) -> Result<StageSummary> {
        let start = Instant::now();
        let mut summary = StageSummary::new("bronze-load");

        if !self.root.exists() {
            tracing::info!(
                root = %self.root.display(),
                "No bronze snapshot directory found; nothing to load"
            );
            return Ok(summary.with_duration(start.elapsed()));
        }

        let files = self.snapshot_files()?;
        if files.is_empty() {
            tracing::info!(
                root = %self.root.display(),
                "No snapshot files found in bronze directory"
            );
            return Ok(summary.with_duration(start.elapsed()));
        }

        for path in files {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let table = snapshot::derive_table_name(&file_name);

            tracing::info!(file = %file_name, table = %table, "Loading snapshot");

            match self.load_one(&path, &table).await {
                Ok(rows) => {
                    tracing::info!(table = %table, rows = rows, "Bronze table replaced");
                    summary.record_success(table, Some(rows));
                }
                Err(e) => {
                    tracing::error!(
                        file = %file_name,
                        table = %table,
                        error = %e,
                        "Failed to load snapshot"
                    );
                    summary.record_failure(table, e.to_string());
                }
            }
        }

        Ok(summary.with_duration(start.elapsed()))
    }

    async fn load_one(&self, path: &Path, table: &str) -> Result<usize> {
        let mut frame = snapshot::read_snapshot(path)?;
        frame.stringify_nested_columns()?;
        self.store.replace_table(table, &frame).await?;
        Ok(frame.row_count())
    }

    /// Snapshot files under the root and its immediate subfolders, sorted
    fn snapshot_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        collect_snapshots(&self.root, &mut files, true)?;
        files.sort();
        Ok(files)
    }
}

fn collect_snapshots(dir: &Path, files: &mut Vec<PathBuf>, recurse: bool) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recurse {
                collect_snapshots(&path, files, false)?;
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(SNAPSHOT_EXTENSION))
            .unwrap_or(false)
        {
            files.push(path);
        }
    }
    Ok(())
}
