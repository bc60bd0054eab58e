//! PostgreSQL database integration
//!
//! This module provides integration with PostgreSQL for storing bronze,
//! silver, and star-schema tables through connection pooling.

pub mod client;
pub mod store;

pub use client::PostgresClient;
pub use store::PostgresStore;
