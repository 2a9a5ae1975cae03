//! # Dashboard Runtime
//!
//! Drives agent tasks from creation to deregistration.
//!
//! - [`AgentDispatch`] - explicit table from [`AgentKind`] to [`AgentBuilder`]
//! - [`ProcessAgent`] - agent backed by an external command
//! - [`TaskRunner`] - the per-task lifecycle state machine
//!
//! [`AgentKind`]: dashboard_protocols::AgentKind

pub mod dispatch;
pub mod process;
pub mod runner;

pub use dispatch::{AgentBuilder, AgentDispatch};
pub use process::{ProcessAgent, ProcessAgentBuilder};
pub use runner::{TaskOutcome, TaskRunner, TaskState};
