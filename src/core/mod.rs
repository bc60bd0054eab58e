//! Core business logic for FhirLake.
//!
//! This module contains the transformation stages and their orchestration.
//!
//! # Modules
//!
//! - [`bronze`] - Fetch resources, land Parquet snapshots, load bronze tables
//! - [`silver`] - Clean and schema-complete the bronze tables
//! - [`star`] - Project silver tables into dimension and fact tables
//! - [`pipeline`] - Stage orchestration and run summaries
//!
//! # Pipeline Workflow
//!
//! 1. **Fetch**: One paginated request per resource type, flattened to rows
//! 2. **Snapshot**: Rows land as timestamped Parquet files (bronze)
//! 3. **Load**: Snapshots replace `bronze_*` tables, nested values as JSON text
//! 4. **Transform**: Bronze tables become column-complete `silver_*` tables
//! 5. **Model**: Silver tables project into `dim_*` and `fact_*` tables
//!
//! # Example
//!
//! ```rust,no_run
//! use fhirlake::config::load_config;
//! use fhirlake::core::pipeline::PipelineCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fhirlake.toml")?;
//! let limit = config.fhir.page_size;
//!
//! let coordinator = PipelineCoordinator::new(config).await?;
//! let summary = coordinator.execute_run(limit).await?;
//!
//! println!("Stages run: {}", summary.stages.len());
//! # Ok(())
//! # }
//! ```

pub mod bronze;
pub mod pipeline;
pub mod silver;
pub mod star;
