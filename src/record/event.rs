//! Record and event types.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LoggingError, Result};

/// Field holding the message before the rename step.
pub const EVENT_KEY: &str = "event";
/// Field holding the level name before the rename step.
pub const LEVEL_KEY: &str = "level";
/// Wire name of the level field.
pub const SEVERITY_KEY: &str = "severity";
/// Wire name of the message field.
pub const MESSAGE_KEY: &str = "message";
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Ordered field map for a single log call, plus its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
    positional_args: Vec<Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from bound context fields and a call-site event.
    ///
    /// Context comes first, then keyword fields, then the message under
    /// `event`. A deferred serialization error on the event surfaces here.
    pub fn from_event(context: &Map<String, Value>, event: Event) -> Result<Self> {
        if let Some(err) = event.error {
            return Err(LoggingError::Serialization(err));
        }

        let mut fields = context.clone();
        for (key, value) in event.fields {
            fields.insert(key, value);
        }
        fields.insert(EVENT_KEY.to_string(), Value::String(event.message));

        Ok(Self {
            fields,
            positional_args: event.args,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn positional_args(&self) -> &[Value] {
        &self.positional_args
    }

    pub fn take_positional_args(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.positional_args)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            positional_args: Vec::new(),
        }
    }
}

/// What a call site asks to log: a message template, positional
/// arguments and extra keyword fields.
///
/// Values are converted to JSON as they are added. A value that cannot be
/// converted is remembered and reported when the event is emitted.
#[derive(Debug)]
pub struct Event {
    message: String,
    args: Vec<Value>,
    fields: Map<String, Value>,
    error: Option<serde_json::Error>,
}

impl Event {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            args: Vec::new(),
            fields: Map::new(),
            error: None,
        }
    }

    /// Append a positional interpolation argument.
    pub fn arg<T: Serialize>(mut self, value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => self.args.push(v),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Attach a keyword field, passed through to the output unrenamed.
    pub fn field<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.fields.insert(key.into(), v);
            }
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn fail(&mut self, err: serde_json::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl From<&str> for Event {
    fn from(message: &str) -> Self {
        Event::new(message)
    }
}

impl From<String> for Event {
    fn from(message: String) -> Self {
        Event::new(message)
    }
}
