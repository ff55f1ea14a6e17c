// src/internal/router/sink.rs

use super::context::Context;
use super::operation::Level;

/// A PSR-style logger capability the router forwards to.
///
/// Implementors only need [`Logger::log`]; the level-named methods are
/// provided.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, context: &Context);

    /// Whether this logger discards everything. The router skips the call
    /// and reports [`Dispatch::Discarded`](super::Dispatch::Discarded).
    fn is_noop(&self) -> bool {
        false
    }

    fn emergency(&self, message: &str, context: &Context) {
        self.log(Level::Emergency, message, context);
    }

    fn alert(&self, message: &str, context: &Context) {
        self.log(Level::Alert, message, context);
    }

    fn critical(&self, message: &str, context: &Context) {
        self.log(Level::Critical, message, context);
    }

    fn error(&self, message: &str, context: &Context) {
        self.log(Level::Error, message, context);
    }

    fn warning(&self, message: &str, context: &Context) {
        self.log(Level::Warning, message, context);
    }

    fn notice(&self, message: &str, context: &Context) {
        self.log(Level::Notice, message, context);
    }

    fn info(&self, message: &str, context: &Context) {
        self.log(Level::Info, message, context);
    }

    fn debug(&self, message: &str, context: &Context) {
        self.log(Level::Debug, message, context);
    }
}

/// Logger that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _message: &str, _context: &Context) {}

    fn is_noop(&self) -> bool {
        true
    }
}

/// Logger that emits through `tracing`, tagged with a channel name.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    channel: String,
}

impl TracingLogger {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("bot")
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str, context: &Context) {
        let channel = self.channel.as_str();
        let context = (!context.is_empty()).then(|| format!("{:?}", context));
        let context = context.as_deref().unwrap_or("");

        match level {
            Level::Emergency | Level::Alert | Level::Critical | Level::Error => {
                tracing::error!(channel, psr_level = %level, context, "{}", message)
            }
            Level::Warning => tracing::warn!(channel, context, "{}", message),
            Level::Notice | Level::Info => {
                tracing::info!(channel, psr_level = %level, context, "{}", message)
            }
            Level::Debug => tracing::debug!(channel, context, "{}", message),
        }
    }
}
