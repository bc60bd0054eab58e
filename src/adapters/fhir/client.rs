//! FHIR REST client
//!
//! This module provides the HTTP client for fetching paginated resource
//! bundles from a FHIR server. One fetch is a single
//! `GET {base_url}/{ResourceType}?_count={limit}` — there is no paging beyond
//! the count parameter and no retry; a failed fetch aborts that resource
//! type's ingestion for the run.

use crate::adapters::fhir::extract;
use crate::config::FhirConfig;
use crate::domain::{FetchError, FhirLakeError, FlatRecord, ResourceType, Result};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;

/// FHIR search bundle response, reduced to the parts the pipeline reads
#[derive(Debug, Deserialize)]
struct SearchBundle {
    #[serde(default)]
    entry: Vec<BundleEntry>,
}

#[derive(Debug, Deserialize)]
struct BundleEntry {
    resource: Option<serde_json::Value>,
}

/// HTTP client for a FHIR endpoint
pub struct FhirClient {
    base_url: String,
    client: Client,
}

impl FhirClient {
    /// Create a new FHIR client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                FhirLakeError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL of the FHIR server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch up to `limit` resources of one type and flatten them
    ///
    /// Entries without a `resource` key are skipped silently; missing fields
    /// within a resource flatten to null. Record order follows the API's
    /// entry order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for a non-success HTTP status,
    /// [`FetchError::ConnectionFailed`] for network failures, and
    /// [`FetchError::InvalidResponse`] when the body is not a search bundle.
    pub async fn fetch_resources(
        &self,
        resource_type: ResourceType,
        limit: usize,
    ) -> Result<Vec<FlatRecord>> {
        let url = format!("{}/{}?_count={}", self.base_url, resource_type, limit);

        tracing::info!(url = %url, resource_type = %resource_type, "Fetching resources");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let bundle: SearchBundle = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        let records: Vec<FlatRecord> = bundle
            .entry
            .iter()
            .filter_map(|entry| entry.resource.as_ref())
            .map(|resource| extract::extract(resource_type, resource))
            .collect();

        tracing::info!(
            resource_type = %resource_type,
            count = records.len(),
            "Fetched resources"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn test_config(base_url: &str) -> FhirConfig {
        FhirConfig {
            base_url: base_url.to_string(),
            ..FhirConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_patients_with_partial_fields() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "resourceType": "Bundle",
            "entry": [
                {"resource": {"id": "p1", "gender": "male", "birthDate": "1990-01-01", "active": true}},
                {"resource": {"id": "p2", "birthDate": "1985-03-12"}}
            ]
        });
        let mock = server
            .mock("GET", "/Patient?_count=2")
            .with_status(200)
            .with_header("content-type", "application/fhir+json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = FhirClient::new(&test_config(&server.url())).unwrap();
        let records = client
            .fetch_resources(ResourceType::Patient, 2)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("birthDate"), Some(&json!("1990-01-01")));
        // The second entry has no gender; the field is null, never absent.
        assert_eq!(records[1].get("gender"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_fetch_skips_entries_without_resource() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "entry": [
                {"fullUrl": "urn:uuid:abc"},
                {"resource": {"id": "p1"}}
            ]
        });
        let _mock = server
            .mock("GET", "/Patient?_count=50")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = FhirClient::new(&test_config(&server.url())).unwrap();
        let records = client
            .fetch_resources(ResourceType::Patient, 50)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), Some(&json!("p1")));
    }

    #[tokio::test]
    async fn test_fetch_missing_entry_array_yields_no_records() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/Observation?_count=50")
            .with_status(200)
            .with_body(json!({"resourceType": "Bundle", "total": 0}).to_string())
            .create_async()
            .await;

        let client = FhirClient::new(&test_config(&server.url())).unwrap();
        let records = client
            .fetch_resources(ResourceType::Observation, 50)
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/Condition?_count=50")
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let client = FhirClient::new(&test_config(&server.url())).unwrap();
        let result = client.fetch_resources(ResourceType::Condition, 50).await;

        match result {
            Err(FhirLakeError::Fetch(FetchError::Status { status, .. })) => {
                assert_eq!(status, 503);
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/Patient?_count=50")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = FhirClient::new(&test_config(&server.url())).unwrap();
        let result = client.fetch_resources(ResourceType::Patient, 50).await;

        assert!(matches!(
            result,
            Err(FhirLakeError::Fetch(FetchError::InvalidResponse(_)))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = FhirClient::new(&test_config("http://example.com/baseR4/")).unwrap();
        assert_eq!(client.base_url(), "http://example.com/baseR4");
    }
}
