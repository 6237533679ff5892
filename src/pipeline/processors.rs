//! Record processors.
//!
//! A closed set of steps, each taking a record and returning the next
//! [`Outcome`]. The default chain is built by [`default_chain`].

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::error::{LoggingError, Result};
use crate::levels::Severity;
use crate::record::{
    percent_format, Record, EVENT_KEY, LEVEL_KEY, MESSAGE_KEY, SEVERITY_KEY, TIMESTAMP_KEY,
};

/// Result of running one processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Hand the record to the next processor.
    Continue(Record),
    /// Discard the record; nothing is written.
    Drop,
    /// Final line, ready for the sink. Ends the chain.
    Rendered(String),
}

/// One step of the processor chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Processor {
    /// Drop records below the threshold. `NotSet` keeps everything.
    FilterByLevel(Severity),
    /// Stamp the call-site severity name under `level`.
    AddLogLevel,
    /// Interpolate positional arguments into `event`.
    FormatPositionalArgs,
    /// Rename `level` to `severity` and `event` to `message`.
    RenameFields,
    /// Add an ISO-8601 UTC `timestamp`.
    TimeStamper,
    /// Serialize to a single-line JSON object.
    RenderJson,
}

impl Processor {
    pub fn name(&self) -> &'static str {
        match self {
            Processor::FilterByLevel(_) => "filter_by_level",
            Processor::AddLogLevel => "add_log_level",
            Processor::FormatPositionalArgs => "format_positional_args",
            Processor::RenameFields => "rename_fields",
            Processor::TimeStamper => "time_stamper",
            Processor::RenderJson => "render_json",
        }
    }

    pub fn apply(&self, severity: Severity, mut record: Record) -> Result<Outcome> {
        match self {
            Processor::FilterByLevel(threshold) => {
                if severity.is_enabled_for(*threshold) {
                    Ok(Outcome::Continue(record))
                } else {
                    Ok(Outcome::Drop)
                }
            }
            Processor::AddLogLevel => {
                record.insert(LEVEL_KEY, severity.name());
                Ok(Outcome::Continue(record))
            }
            Processor::FormatPositionalArgs => {
                let args = record.take_positional_args();
                if args.is_empty() {
                    return Ok(Outcome::Continue(record));
                }
                let formatted = match record.get(EVENT_KEY) {
                    Some(Value::String(template)) => percent_format(template, &args)?,
                    Some(other) => percent_format(&other.to_string(), &args)?,
                    None => {
                        return Err(LoggingError::malformed(
                            "positional arguments given but record has no `event` field",
                        ))
                    }
                };
                record.insert(EVENT_KEY, formatted);
                Ok(Outcome::Continue(record))
            }
            Processor::RenameFields => {
                let level = record.remove(LEVEL_KEY).ok_or_else(|| {
                    LoggingError::malformed("missing `level` field at rename step")
                })?;
                let event = record.remove(EVENT_KEY).ok_or_else(|| {
                    LoggingError::malformed("missing `event` field at rename step")
                })?;
                record.insert(SEVERITY_KEY, level);
                record.insert(MESSAGE_KEY, event);
                Ok(Outcome::Continue(record))
            }
            Processor::TimeStamper => {
                let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
                record.insert(TIMESTAMP_KEY, now);
                Ok(Outcome::Continue(record))
            }
            Processor::RenderJson => {
                let line = serde_json::to_string(record.fields())?;
                Ok(Outcome::Rendered(line))
            }
        }
    }
}

/// The cloud-ingestion chain, in its fixed order.
pub fn default_chain(minimum_level: Severity) -> Vec<Processor> {
    vec![
        Processor::FilterByLevel(minimum_level),
        Processor::AddLogLevel,
        Processor::FormatPositionalArgs,
        Processor::RenameFields,
        Processor::TimeStamper,
        Processor::RenderJson,
    ]
}
