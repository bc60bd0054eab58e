//! FHIR endpoint adapter
//!
//! Client and field-extraction logic for pulling resources from a FHIR
//! REST API.

pub mod client;
pub mod extract;

pub use client::FhirClient;
