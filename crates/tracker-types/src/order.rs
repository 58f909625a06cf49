//! Order types for the bakery tracker.
//!
//! This module defines the persisted order record together with its status
//! and priority enums. The serde representations here are also the exact
//! text stored in the CSV file, so renames are load-bearing.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A customer order tracked through fulfillment.
///
/// Orders are assigned a monotonically increasing id at creation and are
/// never deleted. Field order matches the persisted CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier: 0 for the first order, then max existing id + 1.
	pub id: u64,
	/// Customer the order belongs to. Required non-empty.
	pub customer_name: String,
	/// Free-text description of what was ordered. Required non-empty.
	pub order_details: String,
	/// Date the order was placed.
	pub order_date: NaiveDate,
	/// Date the order is due for delivery.
	pub delivery_date: NaiveDate,
	/// Qualitative urgency tag, display-only.
	pub priority: Priority,
	/// Current fulfillment stage.
	pub status: OrderStatus,
	/// Set once at creation, immutable. Persisted as `YYYY-MM-DD HH:MM:SS`.
	#[serde(with = "created_at_format")]
	pub created_at: NaiveDateTime,
}

/// Input for creating a new order.
///
/// Id, status and created_at are assigned by the ledger at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
	pub customer_name: String,
	pub order_details: String,
	pub order_date: NaiveDate,
	pub delivery_date: NaiveDate,
	pub priority: Priority,
}

/// Fulfillment stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
	/// Order has been recorded but work has not started.
	New,
	/// Order is being prepared.
	#[serde(rename = "In Progress")]
	InProgress,
	/// Order has been fulfilled.
	Completed,
}

impl OrderStatus {
	/// Returns the display/persisted text for this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::New => "New",
			OrderStatus::InProgress => "In Progress",
			OrderStatus::Completed => "Completed",
		}
	}

	/// Returns an iterator over all status variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::New, Self::InProgress, Self::Completed].into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
	type Err = ParseStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// Accept CLI-friendly spellings: case-insensitive, '-' or '_' for ' '.
		match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
			"new" => Ok(Self::New),
			"in progress" | "inprogress" => Ok(Self::InProgress),
			"completed" => Ok(Self::Completed),
			_ => Err(ParseStatusError(s.to_string())),
		}
	}
}

/// Qualitative urgency tag for an order.
///
/// Priority is not used in any scheduling logic beyond display and
/// filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
	High,
	Medium,
	Low,
}

impl Priority {
	/// Returns the display/persisted text for this priority.
	pub fn as_str(&self) -> &'static str {
		match self {
			Priority::High => "High",
			Priority::Medium => "Medium",
			Priority::Low => "Low",
		}
	}

	/// Returns an iterator over all priority variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::High, Self::Medium, Self::Low].into_iter()
	}
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown priority string.
#[derive(Debug, Error)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
	type Err = ParsePriorityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"high" => Ok(Self::High),
			"medium" => Ok(Self::Medium),
			"low" => Ok(Self::Low),
			_ => Err(ParsePriorityError(s.to_string())),
		}
	}
}

/// Serde adapter for the creation timestamp.
///
/// The persisted format is `YYYY-MM-DD HH:MM:SS` rather than chrono's
/// default RFC 3339 text.
pub mod created_at_format {
	use chrono::NaiveDateTime;
	use serde::{self, Deserialize, Deserializer, Serializer};

	const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

	pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.format(FORMAT).to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
	}
}
