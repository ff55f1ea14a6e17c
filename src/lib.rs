pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::{AppConfig, FacadeConfig, LoggingConfig};
pub use internal::debug::{redact_bot_token, DebugBuffer, DebugStream, DEFAULT_TEMPLATE};
pub use internal::error::LogError;
pub use internal::global;
pub use internal::router::{
    Channel, Context, ContextValue, Dispatch, EventRecorder, EventType, Level, LogRouter,
    Logger, NullLogger, Operation, TracingLogger, TracingRecorder,
};

#[cfg(any(test, feature = "test-utils"))]
pub use internal::router::memory::{LoggedMessage, MemoryLogger, MemoryRecorder, RecordedEvent};
