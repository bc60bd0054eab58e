//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for the relational store,
//! allowing the transformation stages to be tested without a running
//! database.

pub mod traits;

pub use traits::TableStore;
