//! Structured logging facade.
//!
//! Provides the application-facing [`StructuredLogging`] object, the host
//! application seam it attaches to, and call-site macros.

pub mod host;
pub mod structured;

pub use host::*;
pub use structured::*;
