//! Agents backed by an external command.
//!
//! The prompt is written to the child's stdin and the trimmed stdout is the
//! result. A non-zero exit fails the run with the child's stderr.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use dashboard_config::AgentCommandConfig;
use dashboard_protocols::{Agent, AgentError, AgentKind};

use crate::dispatch::AgentBuilder;

/// Environment variable carrying the agent kind into the child.
pub const AGENT_KIND_ENV: &str = "DASHBOARD_AGENT_KIND";
/// Environment variable carrying the workspace root into the child.
pub const WORKSPACE_ENV: &str = "DASHBOARD_WORKSPACE";
/// Upper bound on a cleanup command when the agent has no `timeout_seconds`.
pub const DEFAULT_CLEANUP_TIMEOUT_SECS: u64 = 30;

/// One agent instance, bound to one command configuration.
pub struct ProcessAgent {
    kind: AgentKind,
    spec: AgentCommandConfig,
    workspace: PathBuf,
}

impl ProcessAgent {
    pub fn new(kind: AgentKind, spec: AgentCommandConfig, workspace: PathBuf) -> Self {
        Self {
            kind,
            spec,
            workspace,
        }
    }

    fn command(&self, program: &str, args: &[String]) -> Command {
        let cwd = self
            .spec
            .working_dir
            .clone()
            .unwrap_or_else(|| self.workspace.clone());

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(&self.spec.env)
            .env(AGENT_KIND_ENV, self.kind.as_str())
            .env(WORKSPACE_ENV, &self.workspace)
            .current_dir(cwd)
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Agent for ProcessAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        let mut cmd = self.command(&self.spec.command, &self.spec.args);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        debug!("Spawned {} agent: {}", self.kind, self.spec.command);

        let stdin = child.stdin.take();
        let input = prompt.as_bytes().to_vec();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // The child may exit without reading its input.
                if let Err(e) = stdin.write_all(&input).await {
                    debug!("Agent stdin closed early: {}", e);
                }
            }
        };

        let exec = async {
            let (_, output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        let output = match self.spec.timeout_seconds {
            Some(secs) => timeout(Duration::from_secs(secs), exec)
                .await
                .map_err(|_| AgentError::Timeout(secs))??,
            None => exec.await?,
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            Err(AgentError::ExecutionFailed(if stderr.is_empty() {
                format!("Command failed with exit code {}", code)
            } else {
                format!("Command failed with exit code {}: {}", code, stderr)
            }))
        }
    }

    async fn cleanup(&self) -> Result<(), AgentError> {
        let Some((program, args)) = self
            .spec
            .cleanup_command
            .as_deref()
            .and_then(|argv| argv.split_first())
        else {
            return Ok(());
        };

        let secs = self
            .spec
            .timeout_seconds
            .unwrap_or(DEFAULT_CLEANUP_TIMEOUT_SECS);
        let mut cmd = self.command(program, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Dropping the future on timeout kills the child.
        let status = timeout(Duration::from_secs(secs), cmd.status())
            .await
            .map_err(|_| {
                AgentError::CleanupFailed(format!("{} timed out after {}s", program, secs))
            })?
            .map_err(|e| AgentError::CleanupFailed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            warn!("Cleanup command for {} exited with {}", self.kind, status);
            Err(AgentError::CleanupFailed(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }
}

/// Builds a fresh [`ProcessAgent`] per task.
pub struct ProcessAgentBuilder {
    spec: AgentCommandConfig,
    workspace: PathBuf,
}

impl ProcessAgentBuilder {
    pub fn new(spec: AgentCommandConfig, workspace: PathBuf) -> Self {
        Self { spec, workspace }
    }
}

#[async_trait]
impl AgentBuilder for ProcessAgentBuilder {
    async fn build(&self, kind: AgentKind) -> Result<Arc<dyn Agent>, AgentError> {
        if self.spec.command.trim().is_empty() {
            return Err(AgentError::NotConfigured(kind.to_string()));
        }
        Ok(Arc::new(ProcessAgent::new(
            kind,
            self.spec.clone(),
            self.workspace.clone(),
        )))
    }
}

#[cfg(all(test, unix))]
#[path = "process_tests.rs"]
mod tests;
