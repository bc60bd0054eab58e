//! Domain error types
//!
//! This module defines the error hierarchy for FhirLake.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main FhirLake error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum FhirLakeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// FHIR fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Bronze snapshot file errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// FHIR endpoint errors
///
/// Errors that occur when fetching resources from a FHIR server.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to reach the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("FHIR request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be parsed
    #[error("Invalid response from FHIR server: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FhirLakeError {
    fn from(err: std::io::Error) -> Self {
        FhirLakeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FhirLakeError {
    fn from(err: serde_json::Error) -> Self {
        FhirLakeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FhirLakeError {
    fn from(err: toml::de::Error) -> Self {
        FhirLakeError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from arrow errors (snapshot encode/decode)
impl From<arrow::error::ArrowError> for FhirLakeError {
    fn from(err: arrow::error::ArrowError) -> Self {
        FhirLakeError::Snapshot(err.to_string())
    }
}

// Conversion from parquet errors
impl From<parquet::errors::ParquetError> for FhirLakeError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        FhirLakeError::Snapshot(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fhirlake_error_display() {
        let err = FhirLakeError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch_err = FetchError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        let err: FhirLakeError = fetch_err.into();
        assert!(matches!(err, FhirLakeError::Fetch(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: FhirLakeError = io_err.into();
        assert!(matches!(err, FhirLakeError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: FhirLakeError = json_err.into();
        assert!(matches!(err, FhirLakeError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: FhirLakeError = toml_err.into();
        assert!(matches!(err, FhirLakeError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = FhirLakeError::Database("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = FetchError::ConnectionFailed("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
