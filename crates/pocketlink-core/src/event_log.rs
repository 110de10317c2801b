//! Named application events.
//!
//! Services report what happened (`shorten_row_success`,
//! `storage_click_recorded`, ...) through an [`EventLogger`]. The logger
//! forwards to an injected [`EventSink`] and does nothing when none was
//! given. Events are for observability only and never drive control flow.

use serde_json::Value;
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Warn => f.write_str("warn"),
            Level::Error => f.write_str("error"),
        }
    }
}

/// Receives application events.
pub trait EventSink: Send + Sync {
    /// `payload` is `Value::Null` when the event carries no data.
    fn log(&self, level: Level, event: &str, payload: &Value);
}

/// Cheap, cloneable handle the services log through.
#[derive(Clone, Default)]
pub struct EventLogger {
    sink: Option<Arc<dyn EventSink>>,
}

impl EventLogger {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A logger that drops every event.
    pub fn noop() -> Self {
        Self { sink: None }
    }

    pub fn info(&self, event: &str, payload: Value) {
        self.log(Level::Info, event, payload);
    }

    pub fn warn(&self, event: &str, payload: Value) {
        self.log(Level::Warn, event, payload);
    }

    pub fn error(&self, event: &str, payload: Value) {
        self.log(Level::Error, event, payload);
    }

    fn log(&self, level: Level, event: &str, payload: Value) {
        if let Some(sink) = &self.sink {
            sink.log(level, event, &payload);
        }
    }
}

impl fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLogger")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// A single event captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub level: Level,
    pub name: String,
    pub payload: Value,
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }

    /// The first recorded event with the given name.
    pub fn find(&self, name: &str) -> Option<RecordedEvent> {
        self.events().into_iter().find(|e| e.name == name)
    }
}

impl EventSink for RecordingSink {
    fn log(&self, level: Level, event: &str, payload: &Value) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedEvent {
                level,
                name: event.to_owned(),
                payload: payload.clone(),
            });
    }
}
