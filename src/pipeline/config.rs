//! Active pipeline configuration and the process-wide pipeline.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use lazy_static::lazy_static;
use serde_json::{Map, Value};

use crate::error::{LoggingError, Result};
use crate::levels::Severity;
use crate::record::{Event, Record};

use super::logger::BoundLogger;
use super::processors::{default_chain, Outcome, Processor};
use super::sink::{LogSink, StdoutSink};

/// Immutable snapshot of the threshold and processor chain.
///
/// Never mutated after construction; reconfiguring installs a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    minimum_level: Severity,
    processors: Vec<Processor>,
}

impl PipelineConfig {
    /// The default chain filtered at `minimum_level`.
    pub fn new(minimum_level: Severity) -> Self {
        Self {
            minimum_level,
            processors: default_chain(minimum_level),
        }
    }

    /// A custom chain. `minimum_level` is reported by
    /// [`Pipeline::minimum_level`] and used for `is_enabled_for` checks.
    pub fn with_processors(minimum_level: Severity, processors: Vec<Processor>) -> Self {
        Self {
            minimum_level,
            processors,
        }
    }

    pub fn minimum_level(&self) -> Severity {
        self.minimum_level
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Run `record` through the chain.
    ///
    /// Returns `None` when a processor dropped it, otherwise the rendered
    /// line. A chain that finishes without rendering is malformed.
    pub fn process(&self, severity: Severity, record: Record) -> Result<Option<String>> {
        let mut current = record;
        for processor in &self.processors {
            match processor.apply(severity, current)? {
                Outcome::Continue(next) => current = next,
                Outcome::Drop => return Ok(None),
                Outcome::Rendered(line) => return Ok(Some(line)),
            }
        }
        Err(LoggingError::malformed(
            "processor chain ended without rendering the record",
        ))
    }
}

/// A sink plus the configuration currently applied to records bound for it.
///
/// The configuration is held behind an atomic pointer: each log call loads
/// one snapshot and uses it throughout, so it observes either the old or
/// the new chain, never a mix.
pub struct Pipeline {
    config: ArcSwapOption<PipelineConfig>,
    sink: Arc<dyn LogSink>,
}

lazy_static! {
    static ref GLOBAL_PIPELINE: Arc<Pipeline> = Arc::new(Pipeline::new(Arc::new(StdoutSink)));
}

impl Pipeline {
    /// An unconfigured pipeline writing to `sink`.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            config: ArcSwapOption::empty(),
            sink,
        }
    }

    /// The process-wide pipeline, writing to stdout.
    pub fn global() -> Arc<Pipeline> {
        Arc::clone(&GLOBAL_PIPELINE)
    }

    /// Install the default chain at `minimum_level`. Last write wins.
    pub fn configure(&self, minimum_level: Severity) {
        self.install(PipelineConfig::new(minimum_level));
    }

    /// Install an arbitrary configuration. Last write wins.
    pub fn install(&self, config: PipelineConfig) {
        log::debug!(
            "PIPELINE_CONFIGURED min_level={} processors={:?}",
            config.minimum_level(),
            config.processors().iter().map(|p| p.name()).collect::<Vec<_>>()
        );
        self.config.store(Some(Arc::new(config)));
    }

    pub fn is_configured(&self) -> bool {
        self.config.load().is_some()
    }

    /// The active configuration, configuring at `NotSet` on first use.
    ///
    /// The implicit default never replaces a configuration installed
    /// concurrently by an explicit call.
    pub fn current(&self) -> Arc<PipelineConfig> {
        if let Some(config) = self.config.load_full() {
            return config;
        }

        let fresh = Arc::new(PipelineConfig::new(Severity::NotSet));
        let previous = self
            .config
            .compare_and_swap(&None::<Arc<PipelineConfig>>, Some(Arc::clone(&fresh)));

        match &*previous {
            Some(existing) => Arc::clone(existing),
            None => {
                log::debug!("PIPELINE_DEFAULTED min_level={}", Severity::NotSet);
                fresh
            }
        }
    }

    pub fn minimum_level(&self) -> Severity {
        self.current().minimum_level()
    }

    /// A handle emitting through this pipeline.
    pub fn get_logger(self: &Arc<Self>) -> BoundLogger {
        self.current();
        BoundLogger::new(Arc::clone(self))
    }

    /// Build a record from `event` and run it through the active chain.
    ///
    /// Filtered records return `Ok(())` without touching the sink.
    pub fn emit(&self, severity: Severity, context: &Map<String, Value>, event: Event) -> Result<()> {
        let config = self.current();
        let record = Record::from_event(context, event)?;

        if let Some(line) = config.process(severity, record)? {
            self.sink.write_line(&line)?;
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config.load_full())
            .finish_non_exhaustive()
    }
}
