//! Configuration module for the bakery order tracker.
//!
//! This module provides structures and utilities for managing tracker
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` environment-variable resolution and validates that all
//! required configuration values are properly set.
//!
//! Every section has a sensible default, so the tracker runs without a
//! configuration file at all: CSV storage at `./data/orders.csv` and the
//! stock reminder windows.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the order tracker.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this tracker instance.
	#[serde(default)]
	pub tracker: TrackerConfig,
	/// Configuration for the storage backend.
	#[serde(default)]
	pub storage: StorageConfig,
	/// Reminder window configuration.
	#[serde(default)]
	pub reminders: ReminderConfig,
}

/// Configuration specific to the tracker instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
	/// Identifier for this tracker instance, used in log lines.
	#[serde(default = "default_tracker_id")]
	pub id: String,
}

impl Default for TrackerConfig {
	fn default() -> Self {
		Self {
			id: default_tracker_id(),
		}
	}
}

/// Returns the default tracker id.
fn default_tracker_id() -> String {
	"bakery".to_string()
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	#[serde(default = "default_storage_primary")]
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	#[serde(default = "default_storage_implementations")]
	pub implementations: HashMap<String, toml::Value>,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self {
			primary: default_storage_primary(),
			implementations: default_storage_implementations(),
		}
	}
}

/// Returns the default primary storage implementation name.
fn default_storage_primary() -> String {
	"csv".to_string()
}

/// Returns the default storage implementation table: a CSV backend with
/// its own defaults.
fn default_storage_implementations() -> HashMap<String, toml::Value> {
	let mut implementations = HashMap::new();
	implementations.insert(
		default_storage_primary(),
		toml::Value::Table(toml::map::Map::new()),
	);
	implementations
}

/// Reminder window configuration.
///
/// The horizon bounds which undelivered orders appear in the reminders
/// view at all; the urgent/upcoming thresholds control bucketing within
/// that window.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReminderConfig {
	/// How many days ahead the reminders view looks. Defaults to 14.
	#[serde(default = "default_horizon_days")]
	pub horizon_days: u64,
	/// Deliveries within this many days are urgent. Defaults to 3.
	#[serde(default = "default_urgent_days")]
	pub urgent_days: i64,
	/// Deliveries within this many days are upcoming. Defaults to 7.
	#[serde(default = "default_upcoming_days")]
	pub upcoming_days: i64,
}

impl Default for ReminderConfig {
	fn default() -> Self {
		Self {
			horizon_days: default_horizon_days(),
			urgent_days: default_urgent_days(),
			upcoming_days: default_upcoming_days(),
		}
	}
}

/// Returns the default reminder horizon in days.
fn default_horizon_days() -> u64 {
	14
}

/// Returns the default urgent threshold in days.
fn default_urgent_days() -> i64 {
	3
}

/// Returns the default upcoming threshold in days.
fn default_upcoming_days() -> i64 {
	7
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture 0 always present");
		let var_name = cap.get(1).expect("group 1 is not optional").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file with environment variable
	/// resolution and validation.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate tracker config
		if self.tracker.id.is_empty() {
			return Err(ConfigError::Validation("Tracker id cannot be empty".into()));
		}

		// Validate storage config
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		// Validate reminder config
		if self.reminders.horizon_days == 0 || self.reminders.horizon_days > 365 {
			return Err(ConfigError::Validation(
				"Reminder horizon_days must be between 1 and 365".into(),
			));
		}
		if self.reminders.urgent_days < 0 {
			return Err(ConfigError::Validation(
				"Reminder urgent_days cannot be negative".into(),
			));
		}
		if self.reminders.upcoming_days < self.reminders.urgent_days {
			return Err(ConfigError::Validation(
				"Reminder upcoming_days cannot be less than urgent_days".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_ORDERS_PATH", "/tmp/orders.csv");

		let input = "path = \"${TEST_ORDERS_PATH}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "path = \"/tmp/orders.csv\"");

		std::env::remove_var("TEST_ORDERS_PATH");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_TRACKER_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_TRACKER_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("MISSING_TRACKER_VAR"));
	}

	#[test]
	fn test_default_config_is_valid() {
		let config = Config::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.storage.primary, "csv");
		assert_eq!(config.reminders.horizon_days, 14);
	}

	#[test]
	fn test_empty_file_parses_to_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.tracker.id, "bakery");
		assert!(config.storage.implementations.contains_key("csv"));
	}

	#[test]
	fn test_full_config() {
		let config_str = r#"
[tracker]
id = "corner-bakery"

[storage]
primary = "csv"
[storage.implementations.csv]
path = "/var/lib/bakery/orders.csv"

[reminders]
horizon_days = 21
urgent_days = 2
upcoming_days = 10
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.tracker.id, "corner-bakery");
		assert_eq!(config.reminders.horizon_days, 21);
		let csv = &config.storage.implementations["csv"];
		assert_eq!(
			csv.get("path").and_then(|v| v.as_str()),
			Some("/var/lib/bakery/orders.csv")
		);
	}

	#[test]
	fn test_primary_must_be_configured() {
		let config_str = r#"
[storage]
primary = "redis"
[storage.implementations.csv]
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary storage 'redis' not found"));
	}

	#[test]
	fn test_reminder_windows_validated() {
		let config_str = r#"
[reminders]
urgent_days = 10
upcoming_days = 5
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("upcoming_days cannot be less than urgent_days"));
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "[tracker]\nid = \"file-bakery\"\n").unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.tracker.id, "file-bakery");
	}
}
