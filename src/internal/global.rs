// src/internal/global.rs

//! Process-wide facade over one [`LogRouter`] and one [`DebugBuffer`].
//!
//! Code that can carry a router around should prefer the explicit types;
//! this module exists for call sites that cannot.
//!
//! ```
//! use tg_log::{global, Context};
//!
//! global::initialize(None, None);
//! global::error("User {id} failed", &Context::new().with("id", 42));
//!
//! if let Some(mut stream) = global::debug_stream() {
//!     use std::io::Write;
//!     let _ = writeln!(stream, "> GET /bot123:secret/getMe");
//! }
//! global::end_debug_stream("Verbose HTTP Request output:\n%s");
//! ```

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::internal::config::FacadeConfig;
use crate::internal::debug::{DebugBuffer, DebugStream};
use crate::internal::error::LogError;
use crate::internal::router::{
    Context, Dispatch, LogRouter, Logger, Operation, TracingLogger, TracingRecorder,
};

struct Global {
    router: RwLock<Arc<LogRouter>>,
    debug: DebugBuffer,
}

static GLOBAL: OnceLock<Global> = OnceLock::new();

fn global() -> &'static Global {
    GLOBAL.get_or_init(|| Global {
        router: RwLock::new(Arc::new(LogRouter::default())),
        debug: DebugBuffer::new(),
    })
}

/// Install the two loggers, each defaulting to a no-op, and rebind the
/// event recorder. Replaces any previously installed router.
pub fn initialize(general: Option<Arc<dyn Logger>>, update: Option<Arc<dyn Logger>>) {
    install(LogRouter::new(general, update));
}

pub fn install(router: LogRouter) {
    tracing::debug!(category = router.category(), "installing global log router");
    *global().router.write() = Arc::new(router);
}

/// Install tracing-backed loggers and apply the debug capture flags from
/// `cfg`.
pub fn configure(cfg: &FacadeConfig) {
    let router = LogRouter::builder()
        .general(Arc::new(TracingLogger::new(cfg.general_channel.clone())))
        .update(Arc::new(TracingLogger::new(cfg.update_channel.clone())))
        .recorder(Arc::new(TracingRecorder::new(cfg.category.clone())))
        .build();
    install(router);

    let debug = &global().debug;
    debug.set_redaction(cfg.remove_bot_token);
    debug.set_always_log_request_and_response(cfg.always_log_request_and_response);
}

/// The currently installed router.
pub fn router() -> Arc<LogRouter> {
    global().router.read().clone()
}

pub fn debug_buffer() -> &'static DebugBuffer {
    &global().debug
}

pub fn log(operation: Operation, message: &str, context: &Context) -> Dispatch {
    router().log(operation, message, context)
}

pub fn log_named(name: &str, message: &str, context: &Context) -> Result<Dispatch, LogError> {
    router().log_named(name, message, context)
}

macro_rules! operation_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(message: &str, context: &Context) -> Dispatch {
                log(Operation::$op, message, context)
            }
        )*
    };
}

operation_fns! {
    emergency => Emergency,
    alert => Alert,
    critical => Critical,
    error => Error,
    warning => Warning,
    notice => Notice,
    info => Info,
    debug => Debug,
    update => Update,
}

/// Handle to the process-wide debug stream; see [`DebugBuffer::acquire`].
pub fn debug_stream() -> Option<DebugStream> {
    debug_buffer().acquire()
}

/// Flush the debug stream through the installed router; see
/// [`DebugBuffer::finalize`].
pub fn end_debug_stream(template: &str) -> Option<Dispatch> {
    debug_buffer().finalize(&router(), template)
}

pub fn complete_request(ok: bool, template: &str) -> Option<Dispatch> {
    debug_buffer().complete_request(&router(), ok, template)
}

pub fn remove_bot_token() -> bool {
    debug_buffer().redaction_enabled()
}

pub fn set_remove_bot_token(enabled: bool) {
    debug_buffer().set_redaction(enabled);
}

pub fn always_log_request_and_response() -> bool {
    debug_buffer().always_log_request_and_response()
}

pub fn set_always_log_request_and_response(enabled: bool) {
    debug_buffer().set_always_log_request_and_response(enabled);
}
