//! Delivery-date reminder types.

use crate::Order;
use std::fmt;

/// Reminder urgency bucket, derived from days remaining until delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderBucket {
	/// Delivery is imminent (default: within 3 days).
	Urgent,
	/// Delivery is coming up (default: within 7 days).
	Upcoming,
	/// Delivery is further out but inside the reminder horizon.
	Planned,
}

impl ReminderBucket {
	/// Classifies a days-remaining count against the given thresholds.
	///
	/// Thresholds are inclusive: `days <= urgent_days` is urgent,
	/// `days <= upcoming_days` is upcoming, anything else is planned.
	pub fn classify(days_remaining: i64, urgent_days: i64, upcoming_days: i64) -> Self {
		if days_remaining <= urgent_days {
			ReminderBucket::Urgent
		} else if days_remaining <= upcoming_days {
			ReminderBucket::Upcoming
		} else {
			ReminderBucket::Planned
		}
	}

	/// Returns the display label for this bucket.
	pub fn as_str(&self) -> &'static str {
		match self {
			ReminderBucket::Urgent => "URGENT",
			ReminderBucket::Upcoming => "Upcoming",
			ReminderBucket::Planned => "Planned",
		}
	}
}

impl fmt::Display for ReminderBucket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An order paired with its reminder classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
	/// The order the reminder is about.
	pub order: Order,
	/// Whole days between the reference date and the delivery date.
	pub days_remaining: i64,
	/// Urgency bucket for rendering.
	pub bucket: ReminderBucket,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classify_boundaries() {
		assert_eq!(ReminderBucket::classify(1, 3, 7), ReminderBucket::Urgent);
		assert_eq!(ReminderBucket::classify(3, 3, 7), ReminderBucket::Urgent);
		assert_eq!(ReminderBucket::classify(4, 3, 7), ReminderBucket::Upcoming);
		assert_eq!(ReminderBucket::classify(7, 3, 7), ReminderBucket::Upcoming);
		assert_eq!(ReminderBucket::classify(8, 3, 7), ReminderBucket::Planned);
		assert_eq!(ReminderBucket::classify(14, 3, 7), ReminderBucket::Planned);
	}
}
