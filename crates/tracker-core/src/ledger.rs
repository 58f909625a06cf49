//! Order ledger implementation.
//!
//! The ledger owns a storage backend and implements every operation the
//! tracker exposes. The collection is small and flat, so each operation
//! loads it whole, works on it in memory, and saves it back when it
//! mutates. Date-dependent operations have an `_on(date)` form so tests
//! can pin the reference date; the plain forms use the current local date.

use chrono::{Duration, Local, NaiveDate, Timelike};
use thiserror::Error;
use tracker_config::ReminderConfig;
use tracker_storage::{StoreError, StoreInterface};
use tracker_types::{NewOrder, Order, OrderStatus, Priority, Reminder, ReminderBucket};

/// Errors that can occur during ledger operations.
///
/// Storage failures are surfaced here instead of being flattened into
/// empty results, so callers can tell "no matches" from "store
/// unreadable".
#[derive(Debug, Error)]
pub enum LedgerError {
	/// The storage backend failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StoreError),
	/// A required field of a new order was empty.
	#[error("Missing required field: {0}")]
	MissingField(&'static str),
	/// No order with the given id exists.
	#[error("Order not found: {0}")]
	OrderNotFound(u64),
}

/// Filter criteria for listing orders.
///
/// The three criteria intersect. An empty set or empty search term
/// imposes no constraint, so the default filter returns everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
	/// Statuses to keep.
	pub statuses: Vec<OrderStatus>,
	/// Priorities to keep.
	pub priorities: Vec<Priority>,
	/// Case-insensitive substring matched against the customer name or
	/// the order details.
	pub search: String,
}

impl OrderFilter {
	/// Checks whether an order passes every active criterion.
	fn matches(&self, order: &Order) -> bool {
		if !self.statuses.is_empty() && !self.statuses.contains(&order.status) {
			return false;
		}
		if !self.priorities.is_empty() && !self.priorities.contains(&order.priority) {
			return false;
		}
		if !self.search.is_empty() {
			let needle = self.search.to_lowercase();
			let hit = order.customer_name.to_lowercase().contains(&needle)
				|| order.order_details.to_lowercase().contains(&needle);
			if !hit {
				return false;
			}
		}
		true
	}
}

/// The order ledger: owns the storage backend and the reminder windows.
pub struct OrderLedger {
	store: Box<dyn StoreInterface>,
	reminders: ReminderConfig,
}

impl OrderLedger {
	/// Creates a new ledger over the given storage backend.
	pub fn new(store: Box<dyn StoreInterface>, reminders: ReminderConfig) -> Self {
		Self { store, reminders }
	}

	/// Ensures the persisted collection exists. Idempotent.
	pub async fn initialize(&self) -> Result<(), LedgerError> {
		self.store.initialize().await?;
		Ok(())
	}

	/// Returns the id the next order will be assigned: 0 for an empty
	/// store, else max existing id + 1.
	pub async fn next_id(&self) -> Result<u64, LedgerError> {
		let orders = self.store.load_all().await?;
		Ok(Self::next_id_in(&orders))
	}

	fn next_id_in(orders: &[Order]) -> u64 {
		orders.iter().map(|o| o.id).max().map_or(0, |max| max + 1)
	}

	/// Records a new order: assigns the next id, sets status to New and
	/// created_at to now, appends and persists.
	///
	/// Customer name and order details are required non-empty.
	pub async fn add(&self, new_order: NewOrder) -> Result<Order, LedgerError> {
		if new_order.customer_name.trim().is_empty() {
			return Err(LedgerError::MissingField("customer_name"));
		}
		if new_order.order_details.trim().is_empty() {
			return Err(LedgerError::MissingField("order_details"));
		}

		let mut orders = self.store.load_all().await?;

		// Truncate to whole seconds to match the persisted format.
		let now = Local::now().naive_local();
		let created_at = now.with_nanosecond(0).unwrap_or(now);

		let order = Order {
			id: Self::next_id_in(&orders),
			customer_name: new_order.customer_name,
			order_details: new_order.order_details,
			order_date: new_order.order_date,
			delivery_date: new_order.delivery_date,
			priority: new_order.priority,
			status: OrderStatus::New,
			created_at,
		};
		orders.push(order.clone());
		self.store.save_all(&orders).await?;

		tracing::info!(id = order.id, customer = %order.customer_name, "recorded new order");
		Ok(order)
	}

	/// Returns the orders due for delivery today, in insertion order.
	pub async fn today(&self) -> Result<Vec<Order>, LedgerError> {
		self.today_on(Local::now().date_naive()).await
	}

	/// Returns the orders due for delivery on the given date.
	pub async fn today_on(&self, date: NaiveDate) -> Result<Vec<Order>, LedgerError> {
		let orders = self.store.load_all().await?;
		Ok(orders
			.into_iter()
			.filter(|o| o.delivery_date == date)
			.collect())
	}

	/// Sets the status of the order with the given id and persists the
	/// collection. An unknown id is an error, not a silent no-op.
	pub async fn update_status(
		&self,
		id: u64,
		status: OrderStatus,
	) -> Result<Order, LedgerError> {
		let mut orders = self.store.load_all().await?;
		let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
			return Err(LedgerError::OrderNotFound(id));
		};

		order.status = status;
		let updated = order.clone();
		self.store.save_all(&orders).await?;

		tracing::info!(id, status = %updated.status, "updated order status");
		Ok(updated)
	}

	/// Returns the orders passing the given filter, in insertion order.
	pub async fn filtered(&self, filter: &OrderFilter) -> Result<Vec<Order>, LedgerError> {
		let orders = self.store.load_all().await?;
		Ok(orders.into_iter().filter(|o| filter.matches(o)).collect())
	}

	/// Returns the not-completed orders due strictly after today and
	/// within the reminder horizon, sorted by delivery date ascending.
	pub async fn upcoming(&self) -> Result<Vec<Order>, LedgerError> {
		self.upcoming_on(Local::now().date_naive()).await
	}

	/// Returns the upcoming orders relative to the given date.
	pub async fn upcoming_on(&self, date: NaiveDate) -> Result<Vec<Order>, LedgerError> {
		let horizon = date + Duration::days(self.reminders.horizon_days as i64);
		let orders = self.store.load_all().await?;

		let mut upcoming: Vec<Order> = orders
			.into_iter()
			.filter(|o| {
				o.status != OrderStatus::Completed
					&& o.delivery_date > date
					&& o.delivery_date <= horizon
			})
			.collect();
		// Stable sort: equal delivery dates keep insertion order.
		upcoming.sort_by_key(|o| o.delivery_date);
		Ok(upcoming)
	}

	/// Returns the upcoming orders classified into reminder buckets.
	pub async fn reminders(&self) -> Result<Vec<Reminder>, LedgerError> {
		self.reminders_on(Local::now().date_naive()).await
	}

	/// Returns the reminders relative to the given date.
	pub async fn reminders_on(&self, date: NaiveDate) -> Result<Vec<Reminder>, LedgerError> {
		let upcoming = self.upcoming_on(date).await?;
		Ok(upcoming
			.into_iter()
			.map(|order| {
				let days_remaining = (order.delivery_date - date).num_days();
				let bucket = ReminderBucket::classify(
					days_remaining,
					self.reminders.urgent_days,
					self.reminders.upcoming_days,
				);
				Reminder {
					order,
					days_remaining,
					bucket,
				}
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracker_storage::implementations::memory::MemoryStore;

	fn ledger() -> OrderLedger {
		OrderLedger::new(Box::new(MemoryStore::new()), ReminderConfig::default())
	}

	fn base_date() -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
	}

	fn new_order(customer: &str, details: &str, delivery: NaiveDate) -> NewOrder {
		NewOrder {
			customer_name: customer.to_string(),
			order_details: details.to_string(),
			order_date: base_date(),
			delivery_date: delivery,
			priority: Priority::Medium,
		}
	}

	fn in_days(days: i64) -> NaiveDate {
		base_date() + Duration::days(days)
	}

	#[tokio::test]
	async fn test_ids_are_sequential_from_zero() {
		let ledger = ledger();
		for expected in 0..4u64 {
			let order = ledger
				.add(new_order("Alice", "bread", in_days(1)))
				.await
				.unwrap();
			assert_eq!(order.id, expected);
		}
	}

	#[tokio::test]
	async fn test_next_id_on_empty_store() {
		let ledger = ledger();
		assert_eq!(ledger.next_id().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_add_sets_status_new() {
		let ledger = ledger();
		let order = ledger
			.add(new_order("Alice", "2 loaves", in_days(4)))
			.await
			.unwrap();
		assert_eq!(order.status, OrderStatus::New);
		assert_eq!(order.customer_name, "Alice");
	}

	#[tokio::test]
	async fn test_add_rejects_empty_required_fields() {
		let ledger = ledger();

		let result = ledger.add(new_order("", "bread", in_days(1))).await;
		assert!(matches!(result, Err(LedgerError::MissingField("customer_name"))));

		let result = ledger.add(new_order("Alice", "  ", in_days(1))).await;
		assert!(matches!(result, Err(LedgerError::MissingField("order_details"))));
	}

	#[tokio::test]
	async fn test_search_is_case_insensitive() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "2 loaves", in_days(4)))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "croissants", in_days(4)))
			.await
			.unwrap();

		let filter = OrderFilter {
			search: "alice".to_string(),
			..Default::default()
		};
		let hits = ledger.filtered(&filter).await.unwrap();
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].customer_name, "Alice");

		// Details are searched too.
		let filter = OrderFilter {
			search: "CROISS".to_string(),
			..Default::default()
		};
		let hits = ledger.filtered(&filter).await.unwrap();
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].customer_name, "Bob");
	}

	#[tokio::test]
	async fn test_filters_intersect() {
		let ledger = ledger();
		let mut first = new_order("Alice", "bread", in_days(1));
		first.priority = Priority::High;
		ledger.add(first).await.unwrap();
		let mut second = new_order("Alice", "cake", in_days(2));
		second.priority = Priority::Low;
		ledger.add(second).await.unwrap();

		ledger
			.update_status(1, OrderStatus::Completed)
			.await
			.unwrap();

		let filter = OrderFilter {
			statuses: vec![OrderStatus::Completed],
			priorities: vec![Priority::Low],
			search: "alice".to_string(),
		};
		let hits = ledger.filtered(&filter).await.unwrap();
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].id, 1);

		// Same statuses but a priority that does not match.
		let filter = OrderFilter {
			statuses: vec![OrderStatus::Completed],
			priorities: vec![Priority::High],
			search: String::new(),
		};
		assert!(ledger.filtered(&filter).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_unfiltered_returns_all_in_insertion_order() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", in_days(9)))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "cake", in_days(1)))
			.await
			.unwrap();
		ledger
			.add(new_order("Cara", "buns", in_days(5)))
			.await
			.unwrap();

		let all = ledger.filtered(&OrderFilter::default()).await.unwrap();
		let ids: Vec<u64> = all.iter().map(|o| o.id).collect();
		assert_eq!(ids, vec![0, 1, 2]);
	}

	#[tokio::test]
	async fn test_today_on_empty_store() {
		let ledger = ledger();
		let today = ledger.today_on(base_date()).await.unwrap();
		assert!(today.is_empty());
	}

	#[tokio::test]
	async fn test_today_matches_delivery_date_only() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", base_date()))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "cake", in_days(1)))
			.await
			.unwrap();

		let today = ledger.today_on(base_date()).await.unwrap();
		assert_eq!(today.len(), 1);
		assert_eq!(today[0].customer_name, "Alice");
	}

	#[tokio::test]
	async fn test_update_status_persists() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", in_days(1)))
			.await
			.unwrap();

		let updated = ledger
			.update_status(0, OrderStatus::InProgress)
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::InProgress);

		let all = ledger.filtered(&OrderFilter::default()).await.unwrap();
		assert_eq!(all[0].status, OrderStatus::InProgress);
	}

	#[tokio::test]
	async fn test_update_status_unknown_id() {
		let ledger = ledger();
		let result = ledger.update_status(42, OrderStatus::Completed).await;
		assert!(matches!(result, Err(LedgerError::OrderNotFound(42))));
	}

	#[tokio::test]
	async fn test_upcoming_window_and_sort() {
		let ledger = ledger();
		// Inserted out of delivery order on purpose.
		ledger
			.add(new_order("Alice", "bread", in_days(5)))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "cake", in_days(2)))
			.await
			.unwrap();
		ledger
			.add(new_order("Cara", "buns", in_days(20)))
			.await
			.unwrap();

		let upcoming = ledger.upcoming_on(base_date()).await.unwrap();
		let customers: Vec<&str> = upcoming.iter().map(|o| o.customer_name.as_str()).collect();
		assert_eq!(customers, vec!["Bob", "Alice"]);
	}

	#[tokio::test]
	async fn test_upcoming_excludes_today_and_horizon_edge() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", base_date()))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "cake", in_days(14)))
			.await
			.unwrap();
		ledger
			.add(new_order("Cara", "buns", in_days(15)))
			.await
			.unwrap();

		let upcoming = ledger.upcoming_on(base_date()).await.unwrap();
		// Due today is excluded; the 14-day edge is included; beyond it is not.
		assert_eq!(upcoming.len(), 1);
		assert_eq!(upcoming[0].customer_name, "Bob");
	}

	#[tokio::test]
	async fn test_completed_orders_never_upcoming() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", in_days(2)))
			.await
			.unwrap();
		ledger
			.update_status(0, OrderStatus::Completed)
			.await
			.unwrap();

		let upcoming = ledger.upcoming_on(base_date()).await.unwrap();
		assert!(upcoming.is_empty());
	}

	#[tokio::test]
	async fn test_reminder_buckets() {
		let ledger = ledger();
		ledger
			.add(new_order("Alice", "bread", in_days(2)))
			.await
			.unwrap();
		ledger
			.add(new_order("Bob", "cake", in_days(6)))
			.await
			.unwrap();
		ledger
			.add(new_order("Cara", "buns", in_days(12)))
			.await
			.unwrap();

		let reminders = ledger.reminders_on(base_date()).await.unwrap();
		assert_eq!(reminders.len(), 3);
		assert_eq!(reminders[0].days_remaining, 2);
		assert_eq!(reminders[0].bucket, ReminderBucket::Urgent);
		assert_eq!(reminders[1].days_remaining, 6);
		assert_eq!(reminders[1].bucket, ReminderBucket::Upcoming);
		assert_eq!(reminders[2].days_remaining, 12);
		assert_eq!(reminders[2].bucket, ReminderBucket::Planned);
	}
}
