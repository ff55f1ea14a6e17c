use std::io;

/// Errors surfaced by the facade outside the routine logging path.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("unknown log operation: {0}")]
    UnknownOperation(String),
    #[error("debug stream is closed")]
    StreamClosed,
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        let kind = match err {
            LogError::StreamClosed => io::ErrorKind::BrokenPipe,
            LogError::UnknownOperation(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
