//! Result type alias for FhirLake
//!
//! This module provides a convenient Result type alias that uses FhirLakeError
//! as the error type.

use super::errors::FhirLakeError;

/// Result type alias for FhirLake operations
///
/// This is a convenience type alias that uses `FhirLakeError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use fhirlake::domain::result::Result;
/// use fhirlake::domain::errors::FhirLakeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FhirLakeError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FhirLakeError>;
