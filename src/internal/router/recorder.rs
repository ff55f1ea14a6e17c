// src/internal/router/recorder.rs

use super::operation::EventType;

/// Category the router binds its recorder to unless configured otherwise.
pub const DEFAULT_CATEGORY: &str = "tdlib";

/// Sink for category-tagged structured events.
///
/// Every routed message reaches the recorder, whether or not a logger is
/// installed.
pub trait EventRecorder: Send + Sync {
    fn category(&self) -> &str;

    fn record(&self, event_type: EventType, message: &str);
}

/// Recorder that emits one `tracing` event per record under target
/// `tg_log::events`.
#[derive(Debug, Clone)]
pub struct TracingRecorder {
    category: String,
}

impl TracingRecorder {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl Default for TracingRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

impl EventRecorder for TracingRecorder {
    fn category(&self) -> &str {
        &self.category
    }

    fn record(&self, event_type: EventType, message: &str) {
        let category = self.category.as_str();
        match event_type {
            EventType::Error => {
                tracing::error!(target: "tg_log::events", category, event = %event_type, "{}", message)
            }
            EventType::Warning => {
                tracing::warn!(target: "tg_log::events", category, event = %event_type, "{}", message)
            }
            EventType::Info => {
                tracing::info!(target: "tg_log::events", category, event = %event_type, "{}", message)
            }
            EventType::Verbose | EventType::Unknown => {
                tracing::trace!(target: "tg_log::events", category, event = %event_type, "{}", message)
            }
        }
    }
}
