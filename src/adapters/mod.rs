//! External system integrations for FhirLake.
//!
//! This module provides adapters for integrating with external systems:
//!
//! - [`fhir`] - FHIR REST API client and field extraction
//! - [`database`] - Relational store abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. The storage layer uses a
//! trait-based abstraction so the transformation stages can run against an
//! in-memory store in tests.
//!
//! ```rust,no_run
//! use fhirlake::adapters::fhir::FhirClient;
//! use fhirlake::config::FhirConfig;
//! use fhirlake::domain::ResourceType;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig::default();
//! let client = FhirClient::new(&config)?;
//! let records = client.fetch_resources(ResourceType::Patient, 50).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod fhir;
pub mod postgresql;
