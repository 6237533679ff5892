//! Level registry.
//!
//! Maps human-readable severity names onto ordinal severities:
//! - Case-insensitive name lookup
//! - `exception` and `warn` aliases
//! - Unknown names are rejected, never defaulted

pub mod registry;

pub use registry::*;
