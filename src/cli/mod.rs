//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for FhirLake using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// FhirLake - FHIR to PostgreSQL star-schema ETL tool
#[derive(Parser, Debug)]
#[command(name = "fhirlake")]
#[command(version, about, long_about = None)]
#[command(author = "FhirLake Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fhirlake.toml", env = "FHIRLAKE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FHIRLAKE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch FHIR resources and land them as bronze Parquet snapshots
    Fetch(commands::fetch::FetchArgs),

    /// Load bronze snapshot files into PostgreSQL tables
    Ingest(commands::ingest::IngestArgs),

    /// Transform bronze tables into cleaned silver tables
    Transform(commands::transform::TransformArgs),

    /// Build the dimension and fact tables from the silver layer
    Model(commands::model::ModelArgs),

    /// Run the full pipeline: fetch, ingest, transform, model
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
