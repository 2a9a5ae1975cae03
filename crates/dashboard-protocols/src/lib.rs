//! # Dashboard Protocols
//!
//! Shared definitions for the OpenManus dashboard control plane.
//! Contains interfaces and wire grammar only - no orchestration logic.
//!
//! - [`Agent`] - the opaque capability set every agent kind exposes
//! - [`AgentKind`] - the closed catalogue of agent kinds
//! - [`Command`] - inbound observer commands (`RUN:`, `GET_LOGS`)
//! - [`DashboardEvent`] - outbound text events (`LOG:`, `STATUS:`, ...)
//! - [`LogRecord`] - captured log entries

pub mod agent;
pub mod command;
pub mod error;
pub mod event;
pub mod log;

pub use agent::{Agent, AgentKind};
pub use command::Command;
pub use error::AgentError;
pub use event::DashboardEvent;
pub use log::{LogLevel, LogRecord};
