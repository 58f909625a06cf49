//! Storage module for the bakery order tracker.
//!
//! This module provides the abstraction for persisting the order
//! collection, supporting different backend implementations such as the
//! CSV file store used in production and an in-memory store for tests.

use async_trait::async_trait;
use thiserror::Error;
use tracker_types::{ConfigSchema, ImplementationRegistry, Order};

/// Re-export implementations
pub mod implementations {
	pub mod csv;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error that occurs when decoding or encoding stored data.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order-collection backends.
///
/// The collection is flat and small, so backends load and save it whole.
/// Stored order is insertion order and must be preserved.
#[async_trait]
pub trait StoreInterface: Send + Sync {
	/// Ensures the persisted collection exists, creating it empty if
	/// absent. Idempotent: an existing collection is left untouched.
	async fn initialize(&self) -> Result<(), StoreError>;

	/// Loads the full collection in stored order.
	///
	/// A store that has never been written reads as an empty collection.
	/// Unreadable or corrupt data is an error, not an empty result.
	async fn load_all(&self) -> Result<Vec<Order>, StoreError>;

	/// Durably replaces the full collection.
	async fn save_all(&self, orders: &[Order]) -> Result<(), StoreError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must
/// provide to create instances of their store interface.
pub type StoreFactory = fn(&toml::Value) -> Result<Box<dyn StoreInterface>, StoreError>;

/// Registry trait for storage implementations.
///
/// This trait extends the base ImplementationRegistry to specify that
/// storage implementations must provide a StoreFactory.
pub trait StoreRegistry: ImplementationRegistry<Factory = StoreFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage
/// implementations. The service wires its factory table from this list.
pub fn get_all_implementations() -> Vec<(&'static str, StoreFactory)> {
	use implementations::{csv, memory};

	vec![
		(csv::Registry::NAME, csv::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}
