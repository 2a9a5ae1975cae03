//! Application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_core::{EventBus, LogStore, TaskRegistry};
use dashboard_runtime::TaskRunner;

/// State shared across handlers and connections.
pub struct AppState {
    pub bus: Arc<EventBus>,
    pub logs: Arc<LogStore>,
    pub registry: Arc<TaskRegistry>,
    pub runner: Arc<TaskRunner>,
    /// Reported by `/api/config`.
    pub workspace_path: PathBuf,
    /// Names of the configured LLMs, sorted.
    pub llm_models: Vec<String>,
    start_time: Instant,
}

impl AppState {
    pub fn new(
        bus: Arc<EventBus>,
        logs: Arc<LogStore>,
        registry: Arc<TaskRegistry>,
        runner: Arc<TaskRunner>,
        workspace_path: PathBuf,
        llm_models: Vec<String>,
    ) -> Self {
        Self {
            bus,
            logs,
            registry,
            runner,
            workspace_path,
            llm_models,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
