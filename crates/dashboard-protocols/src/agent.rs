//! Agent protocol definitions.
//!
//! Agents are opaque execution units. The control plane only ever calls
//! [`Agent::run`] and, once the run is over, [`Agent::cleanup`].

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Core trait for agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the kind this agent was built for.
    fn kind(&self) -> AgentKind;

    /// Run the agent on a prompt and return its final result.
    async fn run(&self, prompt: &str) -> Result<String, AgentError>;

    /// Release resources held by the agent. Agents without cleanup keep the default.
    async fn cleanup(&self) -> Result<(), AgentError> {
        Ok(())
    }
}

/// The closed set of agent kinds the dashboard can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentKind {
    /// General-purpose multi-tool agent.
    Manus,
    /// Browser-control agent.
    #[serde(rename = "BrowserAgent")]
    Browser,
    /// Agent backed by an MCP server.
    #[serde(rename = "MCPAgent")]
    Mcp,
    /// Data analysis and visualization agent.
    DataAnalysis,
}

impl AgentKind {
    /// All kinds, in catalogue order.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Manus,
        AgentKind::Browser,
        AgentKind::Mcp,
        AgentKind::DataAnalysis,
    ];

    /// Wire name, as used in `RUN:<agent_type>|...`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manus => "Manus",
            Self::Browser => "BrowserAgent",
            Self::Mcp => "MCPAgent",
            Self::DataAnalysis => "DataAnalysis",
        }
    }

    /// Human-readable description for the agent catalogue.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Manus => "A versatile agent that can solve various tasks using multiple tools",
            Self::Browser => "A browser agent that can control a browser to accomplish tasks",
            Self::Mcp => "An agent that connects to an MCP server and uses its tools",
            Self::DataAnalysis => "An analytical agent for data analysis and visualization",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    /// Case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AgentError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
