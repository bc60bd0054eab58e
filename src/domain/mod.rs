//! Domain models and types for FhirLake.
//!
//! This module contains the core domain models, types, and business rules:
//!
//! - **Resource types** ([`ResourceType`]) — the fixed set of FHIR resources
//!   the pipeline ingests
//! - **Tabular frames** ([`Frame`], [`FlatRecord`]) — the columnar currency
//!   every stage reads and writes
//! - **Error types** ([`FhirLakeError`], [`FetchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use fhirlake::domain::{FhirLakeError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(FhirLakeError::Configuration("missing base_url".to_string()))
//! }
//! ```

pub mod errors;
pub mod frame;
pub mod resource;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FetchError, FhirLakeError};
pub use frame::{FlatRecord, Frame};
pub use resource::{ResourceType, ALL_RESOURCE_TYPES};
pub use result::Result;
