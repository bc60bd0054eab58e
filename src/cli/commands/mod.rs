//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod fetch;
pub mod ingest;
pub mod init;
pub mod model;
pub mod run;
pub mod transform;
pub mod validate;

use crate::core::pipeline::StageSummary;

/// Print a stage summary: one line per item, then the totals
pub(crate) fn print_stage_summary(summary: &StageSummary) {
    for item in &summary.items {
        match (&item.error, item.rows) {
            (Some(error), _) => println!("  ❌ {} — {}", item.item, error),
            (None, Some(rows)) => println!("  ✅ {} ({} rows)", item.item, rows),
            (None, None) => println!("  ✅ {}", item.item),
        }
    }
    println!(
        "  {} succeeded, {} failed in {:.2}s",
        summary.succeeded(),
        summary.failed(),
        summary.duration.as_secs_f64()
    );
}

/// Exit code for a stage: 0 on full success, 1 on partial failure
pub(crate) fn stage_exit_code(summary: &StageSummary) -> i32 {
    if summary.is_successful() {
        0
    } else {
        1
    }
}
