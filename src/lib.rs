// FhirLake - FHIR to PostgreSQL ETL Tool
// Copyright (c) 2025 FhirLake Contributors
// Licensed under the MIT License

//! # FhirLake - FHIR to PostgreSQL star-schema ETL
//!
//! FhirLake is an ETL tool built in Rust that pulls healthcare resources
//! (Patient, Practitioner, Condition, Observation, Encounter) from a FHIR
//! REST API, lands them as columnar Parquet snapshots, loads them into
//! PostgreSQL, and reshapes them into cleaned and dimensional tables for
//! analytics dashboards.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** paginated resource bundles from a FHIR server
//! - **Landing** flattened resources as timestamped Parquet snapshots (bronze)
//! - **Loading** snapshots into `bronze_*` tables with nested values as JSON text
//! - **Transforming** bronze tables into column-complete `silver_*` tables
//! - **Modeling** silver tables into `dim_*` and `fact_*` star-schema tables
//!
//! ## Architecture
//!
//! FhirLake follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (bronze, silver, star, pipeline)
//! - [`adapters`] - External integrations (FHIR endpoint, PostgreSQL)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fhirlake::config::load_config;
//! use fhirlake::core::pipeline::PipelineCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("fhirlake.toml")?;
//!     let limit = config.fhir.page_size;
//!
//!     // Create pipeline coordinator
//!     let coordinator = PipelineCoordinator::new(config).await?;
//!
//!     // Execute the full pipeline
//!     let summary = coordinator.execute_run(limit).await?;
//!
//!     println!("Pipeline successful: {}", summary.is_successful());
//!     Ok(())
//! }
//! ```
//!
//! ## Data Layers
//!
//! The pipeline is a medallion architecture:
//!
//! - **Bronze**: raw, minimally-processed snapshot of source data, one
//!   Parquet file per fetch, mirrored into `bronze_*` tables on load
//! - **Silver**: cleaned, schema-complete tables, one per resource type;
//!   dot-delimited flattened column names become underscore names and every
//!   expected column is present (null-backfilled when absent)
//! - **Star schema**: `dim_*` tables carry descriptive attributes, one row
//!   per entity; `fact_*` tables carry reference columns only
//!
//! Every table-producing stage is idempotent: rerunning against unchanged
//! upstream state replaces each target table with identical contents.
//!
//! ## Error Handling
//!
//! FhirLake uses the [`domain::FhirLakeError`] type for all errors:
//!
//! ```rust,no_run
//! use fhirlake::domain::FhirLakeError;
//!
//! fn example() -> Result<(), FhirLakeError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = fhirlake::config::load_config("fhirlake.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! FhirLake uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting pipeline");
//! warn!(table = "bronze_patient", "No rows loaded");
//! error!(error = "connection refused", "Stage failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
