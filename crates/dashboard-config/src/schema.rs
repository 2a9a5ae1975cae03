//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dashboard_protocols::{AgentKind, LogLevel};

use crate::error::ConfigError;
use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Named LLM configurations. Only the names are exposed by the dashboard.
    #[serde(default)]
    pub llm: BTreeMap<String, LlmConfig>,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Agent commands keyed by wire name (`Manus`, `BrowserAgent`, ...).
    #[serde(default)]
    pub agents: BTreeMap<String, AgentCommandConfig>,
}

impl Config {
    /// Names of the configured LLMs, sorted.
    pub fn llm_models(&self) -> Vec<String> {
        self.llm.keys().cloned().collect()
    }

    /// Command configuration for an agent kind, if any.
    pub fn agent(&self, kind: AgentKind) -> Option<&AgentCommandConfig> {
        self.agents.get(kind.as_str())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_workspace_root")]
    pub root: String,
}

impl WorkspaceConfig {
    /// Workspace root with `~` expanded.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.root))
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
        }
    }
}

fn default_workspace_root() -> String {
    "workspace".to_string()
}

/// LLM configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Dashboard runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Log records kept in memory.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Outbound frames queued per observer.
    #[serde(default = "default_observer_buffer")]
    pub observer_buffer: usize,

    /// Minimum level captured into the log store.
    #[serde(default = "default_capture_level")]
    pub capture_level: String,
}

impl DashboardConfig {
    pub fn capture_level(&self) -> Result<LogLevel, ConfigError> {
        self.capture_level
            .parse()
            .map_err(|message| ConfigError::InvalidValue {
                field: "dashboard.capture_level".to_string(),
                message,
            })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            observer_buffer: default_observer_buffer(),
            capture_level: default_capture_level(),
        }
    }
}

fn default_log_capacity() -> usize {
    1000
}

fn default_observer_buffer() -> usize {
    100
}

fn default_capture_level() -> String {
    "info".to_string()
}

/// External command backing an agent kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCommandConfig {
    /// Program to execute. The prompt is written to its stdin.
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Defaults to the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Program and arguments run once the task is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_command: Option<Vec<String>>,
}
