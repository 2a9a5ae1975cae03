//! Agent errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown agent type: {0}")]
    UnknownKind(String),

    #[error("Agent {0} is not configured")]
    NotConfigured(String),

    #[error("Failed to start agent process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Cleanup failed: {0}")]
    CleanupFailed(String),

    #[error("Agent panicked: {0}")]
    Panicked(String),

    #[error("Task was cancelled")]
    Cancelled,
}

impl AgentError {
    /// Whether this error is a user input error rather than an execution failure.
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, Self::UnknownKind(_))
    }
}
