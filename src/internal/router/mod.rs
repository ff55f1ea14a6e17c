// src/internal/router/mod.rs

pub mod context;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod operation;
pub mod recorder;
pub mod router;
pub mod sink;

pub use context::{Context, ContextValue};
pub use operation::{Channel, EventType, Level, Operation};
pub use recorder::{EventRecorder, TracingRecorder, DEFAULT_CATEGORY};
pub use router::{Dispatch, LogRouter, LogRouterBuilder};
pub use sink::{Logger, NullLogger, TracingLogger};
