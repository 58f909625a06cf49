//! Common types module for the bakery order tracker.
//!
//! This module defines the core data types and structures used throughout
//! the tracker. It provides a centralized location for shared types to
//! ensure consistency across all components.

/// Order types including the order record, status and priority enums.
pub mod order;
/// Self-registration trait for storage backend implementations.
pub mod registry;
/// Delivery-date reminder types.
pub mod reminder;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use order::*;
pub use registry::*;
pub use reminder::*;
pub use validation::*;
