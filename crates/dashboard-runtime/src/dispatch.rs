//! Agent construction dispatch table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use dashboard_config::Config;
use dashboard_protocols::{Agent, AgentError, AgentKind};

use crate::process::ProcessAgentBuilder;

/// Builds agent instances of one or more kinds.
#[async_trait]
pub trait AgentBuilder: Send + Sync {
    async fn build(&self, kind: AgentKind) -> Result<Arc<dyn Agent>, AgentError>;
}

#[async_trait]
impl<F> AgentBuilder for F
where
    F: Fn(AgentKind) -> Result<Arc<dyn Agent>, AgentError> + Send + Sync,
{
    async fn build(&self, kind: AgentKind) -> Result<Arc<dyn Agent>, AgentError> {
        self(kind)
    }
}

/// Maps each agent kind to the builder that constructs it.
#[derive(Default)]
pub struct AgentDispatch {
    builders: HashMap<AgentKind, Arc<dyn AgentBuilder>>,
}

impl AgentDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from `[agents.*]` configuration. Unknown keys are skipped.
    pub fn from_config(config: &Config, workspace: &Path) -> Self {
        let mut dispatch = Self::new();
        for kind in AgentKind::ALL {
            if let Some(spec) = config.agent(kind) {
                info!("Agent {} backed by command: {}", kind, spec.command);
                dispatch.insert(
                    kind,
                    Arc::new(ProcessAgentBuilder::new(spec.clone(), workspace.to_path_buf())),
                );
            }
        }
        dispatch
    }

    pub fn insert(&mut self, kind: AgentKind, builder: Arc<dyn AgentBuilder>) {
        self.builders.insert(kind, builder);
    }

    pub fn with(mut self, kind: AgentKind, builder: Arc<dyn AgentBuilder>) -> Self {
        self.insert(kind, builder);
        self
    }

    pub fn is_configured(&self, kind: AgentKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Configured kinds, in catalogue order.
    pub fn configured_kinds(&self) -> Vec<AgentKind> {
        AgentKind::ALL
            .into_iter()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }

    /// Construct a fresh agent of the given kind.
    pub async fn construct(&self, kind: AgentKind) -> Result<Arc<dyn Agent>, AgentError> {
        let builder = self
            .builders
            .get(&kind)
            .cloned()
            .ok_or_else(|| AgentError::NotConfigured(kind.to_string()))?;
        builder.build(kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dashboard_config::AgentCommandConfig;

    struct StubAgent(AgentKind);

    #[async_trait]
    impl Agent for StubAgent {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn run(&self, prompt: &str) -> Result<String, AgentError> {
            Ok(format!("{} handled {}", self.0, prompt))
        }
    }

    fn stub_builder() -> Arc<dyn AgentBuilder> {
        Arc::new(|kind: AgentKind| -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(StubAgent(kind)))
        })
    }

    #[tokio::test]
    async fn test_construct_configured_kind() {
        let dispatch = AgentDispatch::new().with(AgentKind::Browser, stub_builder());

        let agent = dispatch.construct(AgentKind::Browser).await.unwrap();
        assert_eq!(agent.kind(), AgentKind::Browser);
        assert_eq!(agent.run("login").await.unwrap(), "BrowserAgent handled login");
    }

    #[tokio::test]
    async fn test_construct_unconfigured_kind() {
        let dispatch = AgentDispatch::new();
        let err = dispatch.construct(AgentKind::Manus).await.err().unwrap();
        assert!(matches!(err, AgentError::NotConfigured(ref k) if k == "Manus"));
    }

    #[tokio::test]
    async fn test_each_construct_yields_new_instance() {
        let dispatch = AgentDispatch::new().with(AgentKind::Manus, stub_builder());
        let a = dispatch.construct(AgentKind::Manus).await.unwrap();
        let b = dispatch.construct(AgentKind::Manus).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_configured_kinds_in_catalogue_order() {
        let dispatch = AgentDispatch::new()
            .with(AgentKind::DataAnalysis, stub_builder())
            .with(AgentKind::Manus, stub_builder());
        assert_eq!(
            dispatch.configured_kinds(),
            vec![AgentKind::Manus, AgentKind::DataAnalysis]
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.agents.insert(
            "MCPAgent".to_string(),
            AgentCommandConfig {
                command: "mcp-agent".to_string(),
                ..Default::default()
            },
        );
        config.agents.insert(
            "NotAKind".to_string(),
            AgentCommandConfig {
                command: "ignored".to_string(),
                ..Default::default()
            },
        );

        let dispatch = AgentDispatch::from_config(&config, Path::new("/tmp"));
        assert_eq!(dispatch.configured_kinds(), vec![AgentKind::Mcp]);
    }
}
