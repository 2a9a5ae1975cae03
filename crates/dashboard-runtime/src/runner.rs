//! Task runner.
//!
//! One run of one agent, driven through
//! `Created -> AgentConstructing -> Running -> Completing -> Done`.
//! Any failure after kind dispatch ends in `Failed`; an unrecognized kind
//! ends in `RejectedUnknownKind` before anything else happens.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use dashboard_core::{EventBus, ObserverId, TaskHandle, TaskRegistry};
use dashboard_protocols::{Agent, AgentError, AgentKind, DashboardEvent};

use crate::dispatch::AgentDispatch;

/// Lifecycle states of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    AgentConstructing,
    Running,
    Completing,
    Done,
    Failed,
    RejectedUnknownKind,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::RejectedUnknownKind)
    }
}

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done { task_id: String, result: String },
    /// `task_id` is `None` when the agent could not be constructed.
    Failed {
        task_id: Option<String>,
        error: String,
    },
    RejectedUnknownKind { kind: String },
}

impl TaskOutcome {
    pub fn state(&self) -> TaskState {
        match self {
            Self::Done { .. } => TaskState::Done,
            Self::Failed { .. } => TaskState::Failed,
            Self::RejectedUnknownKind { .. } => TaskState::RejectedUnknownKind,
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::Done { task_id, .. } => Some(task_id),
            Self::Failed { task_id, .. } => task_id.as_deref(),
            Self::RejectedUnknownKind { .. } => None,
        }
    }
}

/// Runs agent tasks on behalf of observers.
pub struct TaskRunner {
    bus: Arc<EventBus>,
    registry: Arc<TaskRegistry>,
    dispatch: AgentDispatch,
}

impl TaskRunner {
    pub fn new(bus: Arc<EventBus>, registry: Arc<TaskRegistry>, dispatch: AgentDispatch) -> Self {
        Self {
            bus,
            registry,
            dispatch,
        }
    }

    pub fn dispatch(&self) -> &AgentDispatch {
        &self.dispatch
    }

    /// Run a task in the background. The caller is not expected to await it.
    pub fn spawn(
        self: &Arc<Self>,
        observer: ObserverId,
        kind: String,
        prompt: String,
    ) -> JoinHandle<TaskOutcome> {
        let runner = Arc::clone(self);
        tokio::spawn(async move { runner.run(&observer, &kind, &prompt).await })
    }

    /// Drive one task to a terminal state, reporting progress to `observer`.
    pub async fn run(&self, observer: &str, kind: &str, prompt: &str) -> TaskOutcome {
        let kind = match kind.parse::<AgentKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!("Rejected start request: {}", e);
                self.notify(observer, DashboardEvent::error(e.to_string()))
                    .await;
                return TaskOutcome::RejectedUnknownKind {
                    kind: kind.to_string(),
                };
            }
        };

        trace_state(kind, TaskState::AgentConstructing);
        self.notify(
            observer,
            DashboardEvent::status(format!("Creating {} agent...", kind)),
        )
        .await;

        let agent = match self.dispatch.construct(kind).await {
            Ok(agent) => agent,
            Err(e) => return self.fail(observer, kind, None, None, e).await,
        };

        let task_id = self.registry.next_task_id(kind);
        let handle = TaskHandle::new(task_id.clone(), Arc::clone(&agent));
        let cancel = handle.cancel.clone();
        if let Err(e) = self.registry.register(handle) {
            let e = AgentError::ExecutionFailed(e.to_string());
            return self.fail(observer, kind, None, Some(agent.as_ref()), e).await;
        }

        trace_state(kind, TaskState::Running);
        info!("Task {} started", task_id);
        self.notify(
            observer,
            DashboardEvent::status(format!("Running {} with prompt: {}", kind, prompt)),
        )
        .await;

        let result = tokio::select! {
            outcome = AssertUnwindSafe(agent.run(prompt)).catch_unwind() => match outcome {
                Ok(result) => result,
                Err(payload) => Err(AgentError::Panicked(panic_message(payload.as_ref()))),
            },
            _ = cancel.cancelled() => Err(AgentError::Cancelled),
        };

        match result {
            Ok(result) => {
                trace_state(kind, TaskState::Completing);
                self.notify(observer, DashboardEvent::result(result.clone()))
                    .await;
                self.cleanup(&task_id, agent.as_ref()).await;
                self.registry.unregister(&task_id);
                info!("Task {} completed", task_id);
                TaskOutcome::Done { task_id, result }
            }
            Err(e) => {
                self.fail(observer, kind, Some(task_id), Some(agent.as_ref()), e)
                    .await
            }
        }
    }

    async fn notify(&self, observer: &str, event: DashboardEvent) {
        if !self.bus.send_to(observer, event.to_string()).await {
            debug!("Observer {} gone, dropped {} event", observer, event.prefix());
        }
    }

    async fn fail(
        &self,
        observer: &str,
        kind: AgentKind,
        task_id: Option<String>,
        agent: Option<&dyn Agent>,
        error: AgentError,
    ) -> TaskOutcome {
        trace_state(kind, TaskState::Failed);
        let message = format!("Error running {}: {}", kind, error);
        error!("{}", message);
        self.notify(observer, DashboardEvent::error(message)).await;

        if let Some(agent) = agent {
            let label = task_id.as_deref().unwrap_or(kind.as_str());
            self.cleanup(label, agent).await;
        }
        if let Some(task_id) = &task_id {
            self.registry.unregister(task_id);
        }

        TaskOutcome::Failed {
            task_id,
            error: error.to_string(),
        }
    }

    async fn cleanup(&self, task_id: &str, agent: &dyn Agent) {
        match AssertUnwindSafe(agent.cleanup()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Cleanup of {} failed: {}", task_id, e),
            Err(payload) => warn!(
                "Cleanup of {} panicked: {}",
                task_id,
                panic_message(payload.as_ref())
            ),
        }
    }
}

fn trace_state(kind: AgentKind, state: TaskState) {
    debug!("{} task -> {:?}", kind, state);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
