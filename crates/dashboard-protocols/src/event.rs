//! Outbound dashboard events.
//!
//! Every event is a single text frame `<PREFIX>:<message>`.

use std::fmt;

/// An event sent to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A log line.
    Log(String),

    /// Task lifecycle status.
    Status(String),

    /// Intermediate agent progress. Reserved; the default task flow never emits it.
    Agent(String),

    /// Final task result.
    Result(String),

    /// Task failure or rejected command.
    Error(String),
}

impl DashboardEvent {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log(message.into())
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::Status(message.into())
    }

    pub fn result(message: impl Into<String>) -> Self {
        Self::Result(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Wire prefix, without the trailing colon.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Log(_) => "LOG",
            Self::Status(_) => "STATUS",
            Self::Agent(_) => "AGENT",
            Self::Result(_) => "RESULT",
            Self::Error(_) => "ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Log(m) | Self::Status(m) | Self::Agent(m) | Self::Result(m) | Self::Error(m) => m,
        }
    }
}

impl fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix(), self.message())
    }
}

impl From<DashboardEvent> for String {
    fn from(event: DashboardEvent) -> Self {
        event.to_string()
    }
}
