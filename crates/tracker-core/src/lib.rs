//! Core module for the bakery order tracker.
//!
//! This module provides the order ledger: the single owner of the
//! persisted order collection. It implements creation with monotonic id
//! assignment, day and filter listings, status updates, and the
//! delivery-date reminder view. The presentation layer calls into the
//! ledger and renders its results.

pub mod ledger;

pub use ledger::{LedgerError, OrderFilter, OrderLedger};
