// src/internal/router/memory.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::context::Context;
use super::operation::{EventType, Level};
use super::recorder::{EventRecorder, DEFAULT_CATEGORY};
use super::sink::Logger;

/// A message captured by [`MemoryLogger`].
#[derive(Debug, Clone)]
pub struct LoggedMessage {
    pub level: Level,
    pub message: String,
    pub context: Context,
}

/// Logger for tests: keeps every call in memory. Clones share storage.
#[derive(Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<LoggedMessage>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LoggedMessage> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str, context: &Context) {
        self.entries.lock().push(LoggedMessage {
            level,
            message: message.to_string(),
            context: context.clone(),
        });
    }
}

/// An event captured by [`MemoryRecorder`].
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub category: String,
    pub event_type: EventType,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Recorder for tests. Clones share storage.
#[derive(Clone)]
pub struct MemoryRecorder {
    category: String,
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl MemoryRecorder {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// `(event_type, message)` pairs in record order.
    pub fn pairs(&self) -> Vec<(EventType, String)> {
        self.events
            .lock()
            .iter()
            .map(|e| (e.event_type, e.message.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for MemoryRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

impl EventRecorder for MemoryRecorder {
    fn category(&self) -> &str {
        &self.category
    }

    fn record(&self, event_type: EventType, message: &str) {
        self.events.lock().push(RecordedEvent {
            category: self.category.clone(),
            event_type,
            message: message.to_string(),
            recorded_at: Utc::now(),
        });
    }
}
