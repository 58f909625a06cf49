//! In-memory storage backend.
//!
//! Keeps the order collection in a Vec behind a read-write lock. Nothing
//! survives a restart, which is exactly what tests and development want.

use crate::{StoreError, StoreInterface};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracker_types::{ConfigSchema, ImplementationRegistry, Order, Schema, ValidationError};

/// In-memory order store.
pub struct MemoryStore {
	/// The collection protected by a read-write lock.
	orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryStore {
	/// Creates a new empty MemoryStore.
	pub fn new() -> Self {
		Self {
			orders: Arc::new(RwLock::new(Vec::new())),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StoreInterface for MemoryStore {
	async fn initialize(&self) -> Result<(), StoreError> {
		// The collection exists from construction; nothing to create.
		Ok(())
	}

	async fn load_all(&self) -> Result<Vec<Order>, StoreError> {
		let orders = self.orders.read().await;
		Ok(orders.clone())
	}

	async fn save_all(&self, orders: &[Order]) -> Result<(), StoreError> {
		let mut store = self.orders.write().await;
		*store = orders.to_vec();
		Ok(())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStoreSchema)
	}
}

/// Configuration schema for MemoryStore.
pub struct MemoryStoreSchema;

impl ConfigSchema for MemoryStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no required configuration
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a memory store from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_store(_config: &toml::Value) -> Result<Box<dyn StoreInterface>, StoreError> {
	Ok(Box::new(MemoryStore::new()))
}

/// Registry entry for the in-memory backend.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StoreFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl crate::StoreRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use tracker_types::{OrderStatus, Priority};

	fn order(id: u64) -> Order {
		Order {
			id,
			customer_name: "Alice".to_string(),
			order_details: "sourdough".to_string(),
			order_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
			delivery_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
			priority: Priority::Medium,
			status: OrderStatus::New,
			created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
				.unwrap()
				.and_hms_opt(8, 0, 0)
				.unwrap(),
		}
	}

	#[tokio::test]
	async fn test_basic_operations() {
		let store = MemoryStore::new();

		store.initialize().await.unwrap();
		assert!(store.load_all().await.unwrap().is_empty());

		store.save_all(&[order(0), order(1)]).await.unwrap();
		let loaded = store.load_all().await.unwrap();
		assert_eq!(loaded.len(), 2);
		assert_eq!(loaded[0].id, 0);
		assert_eq!(loaded[1].id, 1);
	}

	#[tokio::test]
	async fn test_save_replaces_collection() {
		let store = MemoryStore::new();

		store.save_all(&[order(0), order(1)]).await.unwrap();
		store.save_all(&[order(2)]).await.unwrap();

		let loaded = store.load_all().await.unwrap();
		assert_eq!(loaded.len(), 1);
		assert_eq!(loaded[0].id, 2);
	}
}
