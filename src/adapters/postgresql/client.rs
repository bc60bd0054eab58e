//! PostgreSQL client implementation
//!
//! This module provides the pooled client for interacting with PostgreSQL.

use crate::config::PostgresConfig;
use crate::domain::{FhirLakeError, Result};
use deadpool_postgres::{Config as PoolConfig, Manager, ManagerConfig, Pool, RecyclingMethod};
use std::time::Duration;
use tokio_postgres::NoTls;

/// PostgreSQL client for FhirLake
///
/// Provides pooled connections for the table-replace and table-read
/// operations the pipeline performs.
pub struct PostgresClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgresConfig,
}

impl PostgresClient {
    /// Create a new PostgreSQL client
    ///
    /// # Arguments
    ///
    /// * `config` - PostgreSQL configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection parameters are invalid or the pool
    /// cannot be created.
    pub fn new(config: PostgresConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config =
            config.connection_string().parse().map_err(|e| {
                FhirLakeError::Configuration(format!("Invalid PostgreSQL parameters: {}", e))
            })?;

        // Create pool configuration
        let mut pool_config = PoolConfig::new();
        pool_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        // Create manager
        let manager = Manager::from_config(pg_config, NoTls, pool_config.manager.unwrap());

        // Create pool
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                FhirLakeError::Database(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| FhirLakeError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            FhirLakeError::Database(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Statement timeout from configuration
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.config.statement_timeout_seconds)
    }

    /// Connection parameters with the password redacted, for logging
    pub fn connection_string_safe(&self) -> String {
        format!(
            "host={} port={} user={} password=*** dbname={}",
            self.config.host, self.config.port, self.config.user, self.config.dbname
        )
    }
}
