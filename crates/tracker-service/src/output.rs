//! Plain-text rendering of ledger results.
//!
//! Listings render as a fixed-width table with the details column
//! truncated; reminders render one line per order with their bucket
//! label.

use tracker_types::{Order, Reminder, ReminderBucket};

/// Longest details text shown in listings before truncation.
const DETAILS_WIDTH: usize = 50;

/// Truncates details text for table display.
fn truncate_details(details: &str) -> String {
	if details.chars().count() <= DETAILS_WIDTH {
		return details.to_string();
	}
	let head: String = details.chars().take(DETAILS_WIDTH).collect();
	format!("{}...", head)
}

/// Renders a collection of orders as a fixed-width table, header included.
pub fn order_table(orders: &[Order]) -> String {
	let mut out = format!(
		"{:<5} {:<11} {:<11} {:<9} {:<12} {:<20} {}\n",
		"ID", "ORDERED", "DELIVERY", "PRIORITY", "STATUS", "CUSTOMER", "DETAILS"
	);
	for order in orders {
		// Width specifiers only pad primitives, so render fields to
		// strings first.
		out.push_str(&format!(
			"{:<5} {:<11} {:<11} {:<9} {:<12} {:<20} {}\n",
			order.id,
			order.order_date.to_string(),
			order.delivery_date.to_string(),
			order.priority.as_str(),
			order.status.as_str(),
			order.customer_name,
			truncate_details(&order.order_details),
		));
	}
	out
}

/// Renders a single reminder as a one-line alert.
pub fn reminder_line(reminder: &Reminder) -> String {
	let order = &reminder.order;
	match reminder.bucket {
		ReminderBucket::Urgent => format!(
			"{:<8} order #{} for {} due in {} day(s)!",
			reminder.bucket.as_str(),
			order.id,
			order.customer_name,
			reminder.days_remaining
		),
		ReminderBucket::Upcoming | ReminderBucket::Planned => format!(
			"{:<8} order #{} for {} due in {} day(s)",
			reminder.bucket.as_str(),
			order.id,
			order.customer_name,
			reminder.days_remaining
		),
	}
}
