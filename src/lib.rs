//! Structured Logging - JSON log records for cloud log ingestion
//!
//! This crate configures a logging pipeline that writes one JSON object per
//! line, using the field names cloud log ingestion expects (`severity`,
//! `message`, `timestamp`). The implementation prioritizes:
//!
//! 1. **Wire compatibility** - Every record carries the ingestion field names
//! 2. **Fail loudly** - Bad level names and malformed records are errors
//! 3. **Consistency** - Reconfiguration is a single atomic swap
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `levels` - Severity levels and case-insensitive name resolution
//! - `record` - Per-call records, call-site events, percent formatting
//! - `pipeline` - Processor chain, active configuration, sinks, logger handles
//! - `logging` - Lazily initialized facade and host application seam
//! - `bridge` - Routes `log` crate records into the pipeline
//!
//! ## Usage
//!
//! ```no_run
//! use structured_logging::{AppContext, Event, StructuredLogging, LOG_LEVEL_CONFIG_KEY};
//!
//! # fn main() -> structured_logging::Result<()> {
//! let app = AppContext::new().with_config(LOG_LEVEL_CONFIG_KEY, "info");
//! let slog = StructuredLogging::attach(&app)?;
//!
//! let logger = slog.get_logger();
//! logger.info("service started")?;
//! logger.warning(Event::new("queue depth %d").arg(120).field("queue", "orders"))?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod error;
pub mod levels;
pub mod logging;
pub mod pipeline;
pub mod record;

pub use bridge::LogBridge;
pub use error::{LoggingError, Result};
pub use levels::{resolve, Severity};
pub use logging::{
    AppContext, FacadeState, HostApplication, StructuredLogging, DEFAULT_LOG_LEVEL,
    EXTENSION_KEY, LOG_LEVEL_CONFIG_KEY,
};
pub use pipeline::{BoundLogger, LogSink, MemorySink, Pipeline, PipelineConfig, Processor, StdoutSink};
pub use record::{Event, Record};

/// Flush the process-wide stdout pipeline.
pub fn logging_flush() -> Result<()> {
    Pipeline::global().flush()
}
