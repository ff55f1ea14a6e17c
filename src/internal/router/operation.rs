// src/internal/router/operation.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::internal::error::LogError;

/// Severity accepted by a [`Logger`](super::Logger), one per PSR-3 level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity understood by the structured event recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Error,
    Warning,
    Info,
    Verbose,
    Unknown,
}

impl EventType {
    /// Map any operation name onto a recorder severity.
    ///
    /// Names outside the known set (including `update`) map to
    /// [`EventType::Unknown`].
    pub fn for_name(name: &str) -> Self {
        match name.parse::<Operation>() {
            Ok(op) => op.event_type(),
            Err(_) => EventType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Error => "ERROR",
            EventType::Warning => "WARNING",
            EventType::Info => "INFO",
            EventType::Verbose => "VERBOSE",
            EventType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination chosen for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    General,
    Update,
}

/// The closed set of log operations the router accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
    Update,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Emergency,
        Operation::Alert,
        Operation::Critical,
        Operation::Error,
        Operation::Warning,
        Operation::Notice,
        Operation::Info,
        Operation::Debug,
        Operation::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Update => "update",
            other => other.level().as_str(),
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Operation::Emergency | Operation::Alert | Operation::Critical | Operation::Error => {
                EventType::Error
            }
            Operation::Warning => EventType::Warning,
            Operation::Notice | Operation::Info => EventType::Info,
            Operation::Debug => EventType::Verbose,
            Operation::Update => EventType::Unknown,
        }
    }

    /// Level handed to the selected logger; `update` is logged as `info`.
    pub fn level(&self) -> Level {
        match self {
            Operation::Emergency => Level::Emergency,
            Operation::Alert => Level::Alert,
            Operation::Critical => Level::Critical,
            Operation::Error => Level::Error,
            Operation::Warning => Level::Warning,
            Operation::Notice => Level::Notice,
            Operation::Info | Operation::Update => Level::Info,
            Operation::Debug => Level::Debug,
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Operation::Update => Channel::Update,
            _ => Channel::General,
        }
    }
}

impl From<Level> for Operation {
    fn from(level: Level) -> Self {
        match level {
            Level::Emergency => Operation::Emergency,
            Level::Alert => Operation::Alert,
            Level::Critical => Operation::Critical,
            Level::Error => Operation::Error,
            Level::Warning => Operation::Warning,
            Level::Notice => Operation::Notice,
            Level::Info => Operation::Info,
            Level::Debug => Operation::Debug,
        }
    }
}

impl FromStr for Operation {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| LogError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_table() {
        let expected = [
            ("emergency", EventType::Error),
            ("alert", EventType::Error),
            ("critical", EventType::Error),
            ("error", EventType::Error),
            ("warning", EventType::Warning),
            ("notice", EventType::Info),
            ("info", EventType::Info),
            ("debug", EventType::Verbose),
            ("update", EventType::Unknown),
            ("trace", EventType::Unknown),
            ("", EventType::Unknown),
        ];

        for (name, event_type) in expected {
            assert_eq!(EventType::for_name(name), event_type, "name: {}", name);
        }
    }

    #[test]
    fn test_update_is_logged_as_info_on_update_channel() {
        assert_eq!(Operation::Update.level(), Level::Info);
        assert_eq!(Operation::Update.channel(), Channel::Update);
        assert_eq!(Operation::Info.channel(), Channel::General);
    }

    #[test]
    fn test_parse_is_case_sensitive_and_closed() {
        assert_eq!("warning".parse::<Operation>().unwrap(), Operation::Warning);
        assert!(matches!(
            "Warning".parse::<Operation>(),
            Err(LogError::UnknownOperation(name)) if name == "Warning"
        ));
        assert!("warn".parse::<Operation>().is_err());
    }

    #[test]
    fn test_every_operation_round_trips_through_its_name() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
        for level in Level::ALL {
            assert_eq!(Operation::from(level).level(), level);
        }
    }
}
