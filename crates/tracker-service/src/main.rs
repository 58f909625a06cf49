//! Main entry point for the bakery order tracker.
//!
//! This binary is the presentation layer over the order ledger: it wires
//! a storage backend from configuration, then dispatches one subcommand
//! per invocation — record an order, show today's deliveries, list and
//! filter, update a status, or show delivery reminders.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracker_config::Config;
use tracker_core::{OrderFilter, OrderLedger};
use tracker_storage::{get_all_implementations, StoreFactory, StoreInterface};
use tracker_types::{NewOrder, OrderStatus, Priority};

mod output;

/// Command-line arguments for the tracker.
#[derive(Parser, Debug)]
#[command(name = "bakery-tracker", author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create the orders file without recording anything
	Init,
	/// Record a new order
	Add {
		/// Customer name
		#[arg(long)]
		customer: String,
		/// What was ordered
		#[arg(long)]
		details: String,
		/// Date the order was placed (YYYY-MM-DD, defaults to today)
		#[arg(long)]
		order_date: Option<NaiveDate>,
		/// Date the order is due (YYYY-MM-DD)
		#[arg(long)]
		delivery_date: NaiveDate,
		/// Urgency tag: high, medium or low
		#[arg(long, default_value = "medium")]
		priority: Priority,
	},
	/// Show today's deliveries
	Today,
	/// List orders, optionally filtered and searched
	List {
		/// Keep only these statuses (repeatable)
		#[arg(long = "status")]
		statuses: Vec<OrderStatus>,
		/// Keep only these priorities (repeatable)
		#[arg(long = "priority")]
		priorities: Vec<Priority>,
		/// Case-insensitive search over customer name and details
		#[arg(long, default_value = "")]
		search: String,
	},
	/// Update the status of an order
	SetStatus {
		/// Id of the order to update
		id: u64,
		/// New status: new, in-progress or completed
		status: OrderStatus,
	},
	/// Show delivery reminders bucketed by days remaining
	Reminders,
}

/// Main entry point for the tracker.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration (defaults when no file is present)
/// 4. Builds the ledger over the configured storage backend
/// 5. Dispatches the requested subcommand
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).init();

	// A single-user tool should run out of the box: a missing config file
	// means defaults, an existing one must parse.
	let config = if tokio::fs::try_exists(&args.config).await? {
		let path = args
			.config
			.to_str()
			.ok_or("configuration path is not valid UTF-8")?;
		Config::from_file(path).await?
	} else {
		tracing::debug!(path = %args.config.display(), "no configuration file, using defaults");
		Config::default()
	};
	tracing::debug!(id = %config.tracker.id, "loaded configuration");

	let store = build_store(&config)?;
	let ledger = OrderLedger::new(store, config.reminders.clone());
	ledger.initialize().await?;

	run_command(args.command, &ledger).await
}

/// Builds the configured primary storage backend.
///
/// The implementation name must match a registered backend, and the
/// backend's own configuration section is validated against its schema.
fn build_store(config: &Config) -> Result<Box<dyn StoreInterface>, Box<dyn std::error::Error>> {
	let factories: HashMap<&str, StoreFactory> = get_all_implementations().into_iter().collect();
	let factory = factories
		.get(config.storage.primary.as_str())
		.ok_or_else(|| {
			format!(
				"unknown storage implementation '{}'",
				config.storage.primary
			)
		})?;

	let impl_config = config
		.storage
		.implementations
		.get(&config.storage.primary)
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));

	let store = factory(&impl_config)?;
	store.config_schema().validate(&impl_config)?;
	Ok(store)
}

/// Dispatches a parsed subcommand against the ledger.
async fn run_command(
	command: Command,
	ledger: &OrderLedger,
) -> Result<(), Box<dyn std::error::Error>> {
	match command {
		Command::Init => {
			println!("Orders file ready.");
		},
		Command::Add {
			customer,
			details,
			order_date,
			delivery_date,
			priority,
		} => {
			let order = ledger
				.add(NewOrder {
					customer_name: customer,
					order_details: details,
					order_date: order_date.unwrap_or_else(|| Local::now().date_naive()),
					delivery_date,
					priority,
				})
				.await?;
			println!(
				"Order #{} recorded for {} (delivery {}).",
				order.id, order.customer_name, order.delivery_date
			);
		},
		Command::Today => {
			let orders = ledger.today().await?;
			if orders.is_empty() {
				println!("No orders for today");
			} else {
				print!("{}", output::order_table(&orders));
			}
		},
		Command::List {
			statuses,
			priorities,
			search,
		} => {
			let filter = OrderFilter {
				statuses,
				priorities,
				search,
			};
			let orders = ledger.filtered(&filter).await?;
			if orders.is_empty() {
				println!("No orders found");
			} else {
				print!("{}", output::order_table(&orders));
			}
		},
		Command::SetStatus { id, status } => {
			let order = ledger.update_status(id, status).await?;
			println!("Order #{} status set to {}.", order.id, order.status);
		},
		Command::Reminders => {
			let reminders = ledger.reminders().await?;
			if reminders.is_empty() {
				println!("No upcoming orders");
			} else {
				for reminder in &reminders {
					println!("{}", output::reminder_line(reminder));
				}
			}
		},
	}

	Ok(())
}
