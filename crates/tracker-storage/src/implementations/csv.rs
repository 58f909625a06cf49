//! CSV file storage backend.
//!
//! Persists the order collection as a single CSV file with a header row
//! and one row per order, in insertion order. Writes go to a temporary
//! file which is renamed over the target, so an interrupted write never
//! truncates the collection.

use crate::{StoreError, StoreInterface};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracker_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Order, Schema, ValidationError,
};

/// Default location of the orders file.
const DEFAULT_PATH: &str = "./data/orders.csv";

/// Column names of the persisted format. Must match the field order of
/// [`Order`], which is what the serializer emits for non-empty saves.
const HEADER: [&str; 8] = [
	"id",
	"customer_name",
	"order_details",
	"order_date",
	"delivery_date",
	"priority",
	"status",
	"created_at",
];

/// CSV-file-backed order store.
pub struct CsvStore {
	/// Path of the orders CSV file.
	path: PathBuf,
}

impl CsvStore {
	/// Creates a new CsvStore persisting to the given path.
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Returns the path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Decodes the full collection from raw file contents.
	fn decode(bytes: &[u8]) -> Result<Vec<Order>, StoreError> {
		let mut reader = csv::Reader::from_reader(bytes);
		let mut orders = Vec::new();
		for record in reader.deserialize() {
			let order: Order = record.map_err(|e| StoreError::Serialization(e.to_string()))?;
			orders.push(order);
		}
		Ok(orders)
	}

	/// Encodes the full collection, header row included.
	fn encode(orders: &[Order]) -> Result<Vec<u8>, StoreError> {
		let mut writer = csv::Writer::from_writer(Vec::new());

		// serialize() emits the header from the first record; an empty
		// collection still needs the header row present.
		if orders.is_empty() {
			writer
				.write_record(HEADER)
				.map_err(|e| StoreError::Serialization(e.to_string()))?;
		}
		for order in orders {
			writer
				.serialize(order)
				.map_err(|e| StoreError::Serialization(e.to_string()))?;
		}

		writer
			.into_inner()
			.map_err(|e| StoreError::Serialization(e.to_string()))
	}
}

#[async_trait]
impl StoreInterface for CsvStore {
	async fn initialize(&self) -> Result<(), StoreError> {
		let exists = fs::try_exists(&self.path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;
		if exists {
			return Ok(());
		}
		tracing::debug!(path = %self.path.display(), "creating empty orders file");
		self.save_all(&[]).await
	}

	async fn load_all(&self) -> Result<Vec<Order>, StoreError> {
		let bytes = match fs::read(&self.path).await {
			Ok(bytes) => bytes,
			// A store that was never initialized is an empty collection.
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};
		Self::decode(&bytes)
	}

	async fn save_all(&self, orders: &[Order]) -> Result<(), StoreError> {
		let bytes = Self::encode(orders)?;

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StoreError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to a temp file then renaming.
		let temp_path = self.path.with_extension("tmp");
		fs::write(&temp_path, bytes)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &self.path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		tracing::debug!(count = orders.len(), path = %self.path.display(), "saved orders");
		Ok(())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(CsvStoreSchema)
	}
}

/// Configuration schema for CsvStore.
pub struct CsvStoreSchema;

impl ConfigSchema for CsvStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![], // No required fields
			vec![Field::new("path", FieldType::String)],
		);
		schema.validate(config)
	}
}

/// Factory function to create a CSV store from configuration.
///
/// Configuration parameters:
/// - `path`: location of the orders CSV file (default: "./data/orders.csv")
pub fn create_store(config: &toml::Value) -> Result<Box<dyn StoreInterface>, StoreError> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_PATH)
		.to_string();

	Ok(Box::new(CsvStore::new(PathBuf::from(path))))
}

/// Registry entry for the CSV backend.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "csv";
	type Factory = crate::StoreFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl crate::StoreRegistry for Registry {}
