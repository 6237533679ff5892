//! `log::Log` implementation backed by a [`Pipeline`].

use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, SetLoggerError};
use serde_json::Map;

use crate::levels::Severity;
use crate::pipeline::Pipeline;
use crate::record::Event;

/// Field carrying the `log` target of bridged records.
pub const LOGGER_KEY: &str = "logger";

/// Severity a `log` level is emitted at.
pub fn severity_for(level: log::Level) -> Severity {
    match level {
        log::Level::Error => Severity::Error,
        log::Level::Warn => Severity::Warning,
        log::Level::Info => Severity::Info,
        log::Level::Debug | log::Level::Trace => Severity::Debug,
    }
}

/// Forwards `log` records into a pipeline.
#[derive(Debug)]
pub struct LogBridge {
    pipeline: Arc<Pipeline>,
}

impl LogBridge {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Install as the global `log` logger. Threshold filtering is left to
    /// the pipeline, so the `log` max level is opened fully.
    pub fn install(pipeline: Arc<Pipeline>) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(pipeline)))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        severity_for(metadata.level()).is_enabled_for(self.pipeline.minimum_level())
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let event = Event::new(record.args().to_string()).field(LOGGER_KEY, record.target());
        // `Log::log` cannot return errors; stderr is the last resort.
        if let Err(e) = self
            .pipeline
            .emit(severity_for(record.level()), &Map::new(), event)
        {
            eprintln!("structured logging bridge dropped a record: {}", e);
        }
    }

    fn flush(&self) {
        let _ = self.pipeline.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MemorySink;

    #[test]
    fn test_level_mapping() {
        assert_eq!(severity_for(log::Level::Trace), Severity::Debug);
        assert_eq!(severity_for(log::Level::Warn), Severity::Warning);
        assert_eq!(severity_for(log::Level::Error), Severity::Error);
    }

    #[test]
    fn test_bridge_emits_without_global_install() {
        let sink = MemorySink::new();
        let pipeline = Arc::new(Pipeline::new(Arc::new(sink.clone())));
        pipeline.configure(Severity::Info);
        let bridge = LogBridge::new(pipeline);

        bridge.log(
            &log::Record::builder()
                .args(format_args!("skipped"))
                .level(log::Level::Debug)
                .target("app::db")
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .args(format_args!("pool size {}", 4))
                .level(log::Level::Warn)
                .target("app::db")
                .build(),
        );

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        let out: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(out["severity"], "warning");
        assert_eq!(out["message"], "pool size 4");
        assert_eq!(out["logger"], "app::db");
    }
}
