//! Shared fixtures for handler tests.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use dashboard_core::{EventBus, LogStore, TaskRegistry};
use dashboard_protocols::{Agent, AgentError, AgentKind};
use dashboard_runtime::{AgentBuilder, AgentDispatch, TaskRunner};

use crate::state::AppState;

pub(crate) struct EchoAgent(pub AgentKind);

#[async_trait]
impl Agent for EchoAgent {
    fn kind(&self) -> AgentKind {
        self.0
    }

    async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        Ok(format!("Echo: {}", prompt))
    }
}

pub(crate) fn test_state() -> Arc<AppState> {
    let bus = Arc::new(EventBus::new());
    let logs = Arc::new(LogStore::new(1000));
    let registry = Arc::new(TaskRegistry::new());

    let builder: Arc<dyn AgentBuilder> =
        Arc::new(|kind: AgentKind| -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(EchoAgent(kind)))
        });
    let mut dispatch = AgentDispatch::new();
    for kind in AgentKind::ALL {
        dispatch.insert(kind, builder.clone());
    }

    let runner = Arc::new(TaskRunner::new(bus.clone(), registry.clone(), dispatch));
    Arc::new(AppState::new(
        bus,
        logs,
        registry,
        runner,
        PathBuf::from("/srv/openmanus/workspace"),
        vec!["default".to_string(), "vision".to_string()],
    ))
}
