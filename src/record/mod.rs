//! Log records and call-site events.
//!
//! A call site describes what it wants logged as an [`Event`]; the pipeline
//! turns it into a [`Record`] and runs it through the processor chain.

pub mod event;
pub mod format;

pub use event::*;
pub use format::*;
