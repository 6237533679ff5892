//! Call-site logger handle.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::levels::Severity;
use crate::record::Event;

use super::config::Pipeline;

/// Handle through which application code emits records.
///
/// Holds a reference to its pipeline, not a copy of the configuration, so
/// reconfiguring the pipeline applies to handles obtained earlier.
#[derive(Debug, Clone)]
pub struct BoundLogger {
    pipeline: Arc<Pipeline>,
    context: Arc<Map<String, Value>>,
}

impl BoundLogger {
    pub(crate) fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            context: Arc::new(Map::new()),
        }
    }

    /// A new handle whose records also carry `key`.
    pub fn bind<T: Serialize>(&self, key: impl Into<String>, value: T) -> Result<BoundLogger> {
        let value = serde_json::to_value(value)?;
        let mut context = (*self.context).clone();
        context.insert(key.into(), value);
        Ok(Self {
            pipeline: Arc::clone(&self.pipeline),
            context: Arc::new(context),
        })
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Would a record at `severity` pass the current threshold.
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity.is_enabled_for(self.pipeline.minimum_level())
    }

    pub fn log(&self, severity: Severity, event: impl Into<Event>) -> Result<()> {
        self.pipeline.emit(severity, &self.context, event.into())
    }

    pub fn debug(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Debug, event)
    }

    pub fn info(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Info, event)
    }

    pub fn warning(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Warning, event)
    }

    /// Alias of [`BoundLogger::warning`]; records say `"warning"`.
    pub fn warn(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Warning, event)
    }

    pub fn error(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Error, event)
    }

    /// Alias of [`BoundLogger::error`]; records say `"error"`.
    pub fn exception(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Error, event)
    }

    pub fn critical(&self, event: impl Into<Event>) -> Result<()> {
        self.log(Severity::Critical, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggingError;
    use crate::pipeline::MemorySink;

    fn logger() -> (BoundLogger, MemorySink) {
        let sink = MemorySink::new();
        let pipeline = Arc::new(Pipeline::new(Arc::new(sink.clone())));
        (pipeline.get_logger(), sink)
    }

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_wire_shape() {
        let (log, sink) = logger();
        log.info("hello").unwrap();

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        let out = parse(&lines[0]);
        let obj = out.as_object().unwrap();
        assert_eq!(obj["severity"], "info");
        assert_eq!(obj["message"], "hello");
        assert!(obj["timestamp"].is_string());
        assert!(!obj.contains_key("level"));
        assert!(!obj.contains_key("event"));
    }

    #[test]
    fn test_aliases_stamp_canonical_names() {
        let (log, sink) = logger();
        log.warn("w").unwrap();
        log.exception("e").unwrap();

        let lines = sink.take();
        assert_eq!(parse(&lines[0])["severity"], "warning");
        assert_eq!(parse(&lines[1])["severity"], "error");
    }

    #[test]
    fn test_keyword_fields_pass_through() {
        let (log, sink) = logger();
        log.info(Event::new("login").field("user", "bob").field("attempt", 2))
            .unwrap();

        let out = parse(&sink.take()[0]);
        assert_eq!(out["user"], "bob");
        assert_eq!(out["attempt"], 2);
    }

    #[test]
    fn test_bind_adds_context_without_touching_parent() {
        let (log, sink) = logger();
        let child = log.bind("request_id", "r-42").unwrap();

        child.info("child").unwrap();
        log.info("parent").unwrap();

        let lines = sink.take();
        assert_eq!(parse(&lines[0])["request_id"], "r-42");
        assert!(parse(&lines[1]).get("request_id").is_none());
    }

    #[test]
    fn test_existing_handles_see_new_threshold() {
        let (log, sink) = logger();
        log.pipeline().configure(Severity::Error);

        assert!(!log.is_enabled_for(Severity::Warning));
        log.warning("dropped").unwrap();
        assert!(sink.is_empty());

        log.critical("kept").unwrap();
        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn test_format_error_surfaces_to_caller() {
        let (log, sink) = logger();
        let err = log.info(Event::new("%s %s").arg(1)).unwrap_err();
        assert!(matches!(err, LoggingError::Format { .. }));
        assert!(sink.is_empty());
    }
}
