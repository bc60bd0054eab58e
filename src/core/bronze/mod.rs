//! Bronze layer: fetch, snapshot, load
//!
//! The bronze layer lands raw fetched resources as timestamped Parquet
//! snapshots and mirrors the snapshots into `bronze_*` tables.

pub mod fetcher;
pub mod loader;
pub mod snapshot;

pub use fetcher::BronzeFetcher;
pub use loader::BronzeLoader;
pub use snapshot::SnapshotWriter;
