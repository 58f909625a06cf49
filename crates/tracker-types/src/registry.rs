//! Registry trait for self-registering implementations.
//!
//! Storage backends register themselves with the configuration name they
//! answer to and a factory function that builds them from their TOML
//! section.

/// Base trait for implementation registries.
///
/// Each backend module provides a Registry struct that implements this
/// trait, declaring its configuration name and factory function. The
/// service assembles its factory table from these registrations.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example:
	/// - "csv" for storage.implementations.csv
	/// - "memory" for storage.implementations.memory
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
