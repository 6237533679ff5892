//! Error taxonomy for configuration and log emission.

use thiserror::Error;

/// Errors raised while configuring the pipeline or emitting a record.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Unrecognized severity name handed to the level registry.
    #[error("unknown log level name: {name:?}")]
    Configuration { name: String },

    /// The processor chain saw a record it cannot handle. Indicates a
    /// mis-ordered chain, never retried.
    #[error("malformed log record: {reason}")]
    MalformedRecord { reason: String },

    /// Positional arguments do not fit the message template.
    #[error("cannot format log message: {reason}")]
    Format { reason: String },

    /// A field or argument could not be represented as JSON.
    #[error("cannot serialize log record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink refused the rendered line.
    #[error("cannot write log record: {0}")]
    Io(#[from] std::io::Error),
}

impl LoggingError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoggingError>;
