//! Host application seam.
//!
//! The facade reads its level from the host configuration and registers
//! itself in the host's extension registry so collaborators can find it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::structured::StructuredLogging;

/// Host configuration key naming the minimum level.
pub const LOG_LEVEL_CONFIG_KEY: &str = "STRUCTURED_LOG_LEVEL";
/// Registry key the facade is stored under after `initialize`.
pub const EXTENSION_KEY: &str = "structured_logging";
/// Level used when the host configuration has no entry.
pub const DEFAULT_LOG_LEVEL: &str = "notset";

/// What the facade needs from a host application.
pub trait HostApplication: Send + Sync {
    /// A string configuration value, if set.
    fn config_value(&self, key: &str) -> Option<String>;

    /// Store `extension` under `key`, replacing any previous entry.
    fn register_extension(&self, key: &str, extension: Arc<StructuredLogging>);

    /// The facade registered under `key`, if any.
    fn extension(&self, key: &str) -> Option<Arc<StructuredLogging>>;
}

/// Minimal host: a configuration map plus an extension registry.
#[derive(Default)]
pub struct AppContext {
    config: RwLock<HashMap<String, String>>,
    extensions: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose level setting comes from the `STRUCTURED_LOG_LEVEL`
    /// environment variable, when present.
    pub fn from_env() -> Self {
        let ctx = Self::new();
        if let Ok(level) = std::env::var(LOG_LEVEL_CONFIG_KEY) {
            ctx.set_config(LOG_LEVEL_CONFIG_KEY, level);
        }
        ctx
    }

    pub fn with_config(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_config(key, value);
        self
    }

    pub fn set_config(&self, key: impl Into<String>, value: impl Into<String>) {
        self.config.write().insert(key.into(), value.into());
    }

    /// Any registered extension, downcast to `T`.
    pub fn get_extension<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.extensions.read().get(key).cloned()?;
        entry.downcast::<T>().ok()
    }

    pub fn has_extension(&self, key: &str) -> bool {
        self.extensions.read().contains_key(key)
    }

    pub fn insert_extension<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        self.extensions.write().insert(key.into(), value);
    }
}

impl HostApplication for AppContext {
    fn config_value(&self, key: &str) -> Option<String> {
        self.config.read().get(key).cloned()
    }

    fn register_extension(&self, key: &str, extension: Arc<StructuredLogging>) {
        self.insert_extension(key, extension);
    }

    fn extension(&self, key: &str) -> Option<Arc<StructuredLogging>> {
        self.get_extension::<StructuredLogging>(key)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &*self.config.read())
            .field("extensions", &self.extensions.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
