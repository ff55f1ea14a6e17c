// src/internal/router/router.rs

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::internal::error::LogError;

use super::context::Context;
use super::operation::{Channel, EventType, Operation};
use super::recorder::{EventRecorder, TracingRecorder, DEFAULT_CATEGORY};
use super::sink::{Logger, NullLogger};

/// Outcome of a routed log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The selected logger received the message.
    Delivered(Channel),
    /// The selected logger is a no-op; only the recorder saw the message.
    Discarded(Channel),
}

impl Dispatch {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Dispatch::Delivered(_))
    }

    pub fn channel(&self) -> Channel {
        match self {
            Dispatch::Delivered(c) | Dispatch::Discarded(c) => *c,
        }
    }
}

/// Routes log operations to the general logger, the update logger and the
/// structured event recorder.
pub struct LogRouter {
    general: Arc<dyn Logger>,
    update: Arc<dyn Logger>,
    category: String,
    recorder: OnceLock<Arc<dyn EventRecorder>>,
}

impl LogRouter {
    /// Install the two loggers; either one defaults to [`NullLogger`].
    pub fn new(general: Option<Arc<dyn Logger>>, update: Option<Arc<dyn Logger>>) -> Self {
        let mut builder = LogRouter::builder();
        builder.general = general;
        builder.update = update;
        builder.build()
    }

    pub fn builder() -> LogRouterBuilder {
        LogRouterBuilder::default()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn general_logger(&self) -> &Arc<dyn Logger> {
        &self.general
    }

    pub fn update_logger(&self) -> &Arc<dyn Logger> {
        &self.update
    }

    /// The event recorder, built on first use when none was supplied.
    pub fn recorder(&self) -> &Arc<dyn EventRecorder> {
        self.recorder
            .get_or_init(|| Arc::new(TracingRecorder::new(self.category.clone())))
    }

    pub fn log(&self, operation: Operation, message: &str, context: &Context) -> Dispatch {
        let message = context.interpolate(message);
        self.dispatch(operation, &message, context)
    }

    /// Route an operation given by name.
    ///
    /// An unknown name is still recorded as [`EventType::Unknown`] and then
    /// rejected; no logger is called for it.
    pub fn log_named(
        &self,
        name: &str,
        message: &str,
        context: &Context,
    ) -> Result<Dispatch, LogError> {
        let message = context.interpolate(message);
        match name.parse::<Operation>() {
            Ok(operation) => Ok(self.dispatch(operation, &message, context)),
            Err(err) => {
                self.recorder().record(EventType::Unknown, &message);
                Err(err)
            }
        }
    }

    fn dispatch(&self, operation: Operation, message: &str, context: &Context) -> Dispatch {
        self.recorder().record(operation.event_type(), message);

        let channel = operation.channel();
        let logger = match channel {
            Channel::General => &self.general,
            Channel::Update => &self.update,
        };

        if logger.is_noop() {
            return Dispatch::Discarded(channel);
        }

        logger.log(operation.level(), message, context);
        Dispatch::Delivered(channel)
    }

    pub fn emergency(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Emergency, message, context)
    }

    pub fn alert(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Alert, message, context)
    }

    pub fn critical(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Critical, message, context)
    }

    pub fn error(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Error, message, context)
    }

    pub fn warning(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Warning, message, context)
    }

    pub fn notice(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Notice, message, context)
    }

    pub fn info(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Info, message, context)
    }

    pub fn debug(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Debug, message, context)
    }

    pub fn update(&self, message: &str, context: &Context) -> Dispatch {
        self.log(Operation::Update, message, context)
    }
}

impl Default for LogRouter {
    fn default() -> Self {
        LogRouter::builder().build()
    }
}

impl fmt::Debug for LogRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRouter")
            .field("category", &self.category)
            .field("general_noop", &self.general.is_noop())
            .field("update_noop", &self.update.is_noop())
            .field("recorder_ready", &self.recorder.get().is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct LogRouterBuilder {
    general: Option<Arc<dyn Logger>>,
    update: Option<Arc<dyn Logger>>,
    category: Option<String>,
    recorder: Option<Arc<dyn EventRecorder>>,
}

impl LogRouterBuilder {
    pub fn general(mut self, logger: Arc<dyn Logger>) -> Self {
        self.general = Some(logger);
        self
    }

    pub fn update(mut self, logger: Arc<dyn Logger>) -> Self {
        self.update = Some(logger);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Use this recorder instead of a lazily built [`TracingRecorder`].
    pub fn recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn build(self) -> LogRouter {
        let category = match (&self.category, &self.recorder) {
            (Some(category), _) => category.clone(),
            (None, Some(recorder)) => recorder.category().to_string(),
            (None, None) => DEFAULT_CATEGORY.to_string(),
        };

        LogRouter {
            general: self.general.unwrap_or_else(|| Arc::new(NullLogger)),
            update: self.update.unwrap_or_else(|| Arc::new(NullLogger)),
            category,
            recorder: self.recorder.map(OnceLock::from).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_router_discards_and_builds_recorder_lazily() {
        let router = LogRouter::default();
        assert!(router.recorder.get().is_none());

        let dispatch = router.error("boom", &Context::new());

        assert_eq!(dispatch, Dispatch::Discarded(Channel::General));
        assert!(router.recorder.get().is_some());
        assert_eq!(router.recorder().category(), "tdlib");
    }

    #[test]
    fn test_supplied_recorder_is_ready_and_names_category() {
        let recorder: Arc<dyn EventRecorder> = Arc::new(TracingRecorder::new("bots"));
        let router = LogRouter::builder().recorder(recorder.clone()).build();

        assert!(router.recorder.get().is_some());
        assert!(Arc::ptr_eq(router.recorder(), &recorder));
        assert_eq!(router.category(), "bots");
    }

    #[test]
    fn test_builder_category_reaches_lazy_recorder() {
        let router = LogRouter::builder().category("bots").build();
        assert_eq!(router.recorder().category(), "bots");
    }

    #[test]
    fn test_new_defaults_each_logger_independently() {
        let router = LogRouter::new(Some(Arc::new(NullLogger)), None);
        assert!(router.general_logger().is_noop());
        assert!(router.update_logger().is_noop());
        assert_eq!(
            router.update("u", &Context::new()),
            Dispatch::Discarded(Channel::Update)
        );
    }

    #[test]
    fn test_log_named_rejects_unknown() {
        let router = LogRouter::default();
        let err = router.log_named("verbose", "x", &Context::new()).unwrap_err();
        assert!(matches!(err, LogError::UnknownOperation(name) if name == "verbose"));
    }
}
