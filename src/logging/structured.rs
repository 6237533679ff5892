//! The structured logging facade.
//!
//! Holds at most one memoized [`BoundLogger`]. Explicit initialization
//! through a host application attaches the facade to that host; a bare
//! `get_logger` keeps the pipeline's current configuration and stays
//! standalone.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::levels::{resolve, Severity};
use crate::pipeline::{BoundLogger, Pipeline};

use super::host::{HostApplication, DEFAULT_LOG_LEVEL, EXTENSION_KEY, LOG_LEVEL_CONFIG_KEY};

/// Lifecycle stage of a [`StructuredLogging`] facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacadeState {
    /// No logger memoized yet.
    Uninitialized,
    /// Logger created lazily; no host knows about this facade.
    Standalone,
    /// Logger created by `initialize`; registered in a host registry.
    Attached,
}

#[derive(Debug)]
enum Slot {
    Uninitialized,
    Standalone(BoundLogger),
    Attached { logger: BoundLogger, level: Severity },
}

impl Slot {
    fn logger(&self) -> Option<&BoundLogger> {
        match self {
            Slot::Uninitialized => None,
            Slot::Standalone(logger) | Slot::Attached { logger, .. } => Some(logger),
        }
    }
}

/// Application-facing logging object.
#[derive(Debug)]
pub struct StructuredLogging {
    pipeline: Arc<Pipeline>,
    slot: Mutex<Slot>,
}

impl StructuredLogging {
    /// An uninitialized facade over the process-wide stdout pipeline.
    pub fn new() -> Arc<Self> {
        Self::with_pipeline(Pipeline::global())
    }

    /// An uninitialized facade over a caller-supplied pipeline.
    pub fn with_pipeline(pipeline: Arc<Pipeline>) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            slot: Mutex::new(Slot::Uninitialized),
        })
    }

    /// Construct and immediately attach to `host`.
    pub fn attach<H: HostApplication + ?Sized>(host: &H) -> Result<Arc<Self>> {
        let facade = Self::new();
        facade.initialize(host)?;
        Ok(facade)
    }

    /// Configure from `host` and register this facade in its registry.
    ///
    /// Reads [`LOG_LEVEL_CONFIG_KEY`] (default `"notset"`). An unknown level
    /// name is returned as an error and leaves the facade untouched.
    /// Calling again reconfigures; the last call wins.
    pub fn initialize<H: HostApplication + ?Sized>(self: &Arc<Self>, host: &H) -> Result<()> {
        let name = host
            .config_value(LOG_LEVEL_CONFIG_KEY)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let level = resolve(&name)?;

        {
            let mut slot = self.slot.lock();
            self.pipeline.configure(level);
            *slot = Slot::Attached {
                logger: self.pipeline.get_logger(),
                level,
            };
        }

        host.register_extension(EXTENSION_KEY, Arc::clone(self));
        log::info!("STRUCTURED_LOGGING_ATTACHED level={} key={}", level, EXTENSION_KEY);
        Ok(())
    }

    /// The memoized logger, creating it with defaults on first use.
    ///
    /// The lazy path installs `NotSet` only on a pipeline nobody has
    /// configured yet; a threshold set through another facade is kept. It
    /// does not register with any host.
    pub fn get_logger(&self) -> BoundLogger {
        let mut slot = self.slot.lock();
        if let Some(logger) = slot.logger() {
            return logger.clone();
        }

        let logger = self.pipeline.get_logger();
        *slot = Slot::Standalone(logger.clone());
        log::debug!(
            "STRUCTURED_LOGGING_STANDALONE level={}",
            self.pipeline.minimum_level()
        );
        logger
    }

    pub fn state(&self) -> FacadeState {
        match &*self.slot.lock() {
            Slot::Uninitialized => FacadeState::Uninitialized,
            Slot::Standalone(_) => FacadeState::Standalone,
            Slot::Attached { .. } => FacadeState::Attached,
        }
    }

    /// Level this facade configured, or `None` before first use. A
    /// standalone facade reports the pipeline's current threshold.
    pub fn log_level(&self) -> Option<Severity> {
        match &*self.slot.lock() {
            Slot::Uninitialized => None,
            Slot::Standalone(_) => Some(self.pipeline.minimum_level()),
            Slot::Attached { level, .. } => Some(*level),
        }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Flush the underlying sink.
    pub fn flush(&self) -> Result<()> {
        self.pipeline.flush()
    }
}

/// Build an [`Event`](crate::record::Event) from a template, positional
/// arguments and `key = value` fields.
///
/// ```
/// use structured_logging::log_event;
///
/// let event = log_event!("count=%d", 5; user = "bob");
/// assert_eq!(event.message(), "count=%d");
/// assert_eq!(event.fields()["user"], "bob");
/// ```
#[macro_export]
macro_rules! log_event {
    ($msg:expr $(, $arg:expr)* $(; $($key:ident = $value:expr),* $(,)?)?) => {{
        let event = $crate::record::Event::new($msg);
        $( let event = event.arg($arg); )*
        $($( let event = event.field(stringify!($key), $value); )*)?
        event
    }};
}

/// Log a debug record through a [`BoundLogger`].
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($rest:tt)+) => {
        $logger.debug($crate::log_event!($($rest)+))
    };
}

/// Log an info record through a [`BoundLogger`].
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($rest:tt)+) => {
        $logger.info($crate::log_event!($($rest)+))
    };
}

/// Log a warning record through a [`BoundLogger`].
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($rest:tt)+) => {
        $logger.warning($crate::log_event!($($rest)+))
    };
}

/// Log an error record through a [`BoundLogger`].
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($rest:tt)+) => {
        $logger.error($crate::log_event!($($rest)+))
    };
}

/// Log a critical record through a [`BoundLogger`].
#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($rest:tt)+) => {
        $logger.critical($crate::log_event!($($rest)+))
    };
}
