//! # Dashboard Core
//!
//! The shared, internally synchronized state of the control plane:
//!
//! - [`EventBus`] - connected observers and text event fan-out
//! - [`LogStore`] - bounded ring of recent log records
//! - [`TaskRegistry`] - currently running tasks
//! - [`LogCaptureLayer`] - tracing layer feeding the log store
//!
//! Each component serializes its own mutations. No operation spans more than
//! one of them, so they are owned separately and injected where needed.

pub mod capture;
pub mod error;
pub mod event_bus;
pub mod log_store;
pub mod registry;

pub use capture::LogCaptureLayer;
pub use error::RegistryError;
pub use event_bus::{EventBus, ObserverId, DEFAULT_OBSERVER_BUFFER};
pub use log_store::{LogStore, DEFAULT_LOG_CAPACITY};
pub use registry::{RunningTask, TaskHandle, TaskRegistry};
