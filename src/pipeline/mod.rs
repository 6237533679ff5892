//! Log-record processing pipeline.
//!
//! Every log call runs through a fixed processor chain:
//! 1. Level filter
//! 2. Level-name stamping
//! 3. Positional-argument formatting
//! 4. Field renaming (`level` -> `severity`, `event` -> `message`)
//! 5. Timestamp injection
//! 6. JSON rendering
//!
//! The active chain lives in an immutable [`PipelineConfig`] that is swapped
//! atomically on reconfiguration.

pub mod config;
pub mod logger;
pub mod processors;
pub mod sink;

pub use config::*;
pub use logger::*;
pub use processors::*;
pub use sink::*;
