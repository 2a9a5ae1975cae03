//! Registry of running tasks.
//!
//! Entries are inserted when an agent has been constructed and removed when
//! its run is over. Ids are unique among registered entries at any instant;
//! the registry refuses duplicates instead of overwriting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use dashboard_protocols::{Agent, AgentKind};

use crate::error::RegistryError;

/// Handle to a running task.
pub struct TaskHandle {
    pub task_id: String,
    pub kind: AgentKind,
    pub agent: Arc<dyn Agent>,
    /// Tripped to request the run be abandoned.
    pub cancel: CancellationToken,
    pub started_at: DateTime<Utc>,
}

impl TaskHandle {
    /// Wrap `agent` under `task_id`. The kind is taken from the agent.
    pub fn new(task_id: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            task_id: task_id.into(),
            kind: agent.kind(),
            agent,
            cancel: CancellationToken::new(),
            started_at: Utc::now(),
        }
    }
}

/// Snapshot entry returned by [`TaskRegistry::list_running`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunningTask {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AgentKind,
    pub started_at: DateTime<Utc>,
}

/// Concurrent map from task id to handle.
pub struct TaskRegistry {
    tasks: DashMap<String, TaskHandle>,
    sequence: AtomicU64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Derive a fresh task id of the form `<Kind>_<n>`.
    pub fn next_task_id(&self, kind: AgentKind) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}_{}", kind, n)
    }

    /// Register a task. Fails if the id is already present.
    pub fn register(&self, handle: TaskHandle) -> Result<(), RegistryError> {
        match self.tasks.entry(handle.task_id.clone()) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!("Registered task {}", handle.task_id);
                entry.insert(handle);
                Ok(())
            }
        }
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn unregister(&self, task_id: &str) -> Option<TaskHandle> {
        let removed = self.tasks.remove(task_id).map(|(_, handle)| handle);
        if removed.is_some() {
            debug!("Unregistered task {}", task_id);
        }
        removed
    }

    /// Request cancellation of a running task.
    pub fn cancel(&self, task_id: &str) -> bool {
        match self.tasks.get(task_id) {
            Some(handle) => {
                handle.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Snapshot of registered tasks, in no particular order.
    pub fn list_running(&self) -> Vec<RunningTask> {
        self.tasks
            .iter()
            .map(|entry| RunningTask {
                id: entry.key().clone(),
                kind: entry.value().kind,
                started_at: entry.value().started_at,
            })
            .collect()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
