//! Dashboard API handlers.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use dashboard_core::RunningTask;
use dashboard_protocols::{AgentKind, LogRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// Records returned by `/api/logs` when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Response of `GET /api/config`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub workspace_path: PathBuf,
    pub llm_models: Vec<String>,
}

/// Query of `GET /api/logs`.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    /// Kept as text so a malformed value is reported like any other bad limit.
    pub limit: Option<String>,
}

impl LogsQuery {
    fn limit(&self) -> Result<NonZeroUsize, ApiError> {
        let Some(raw) = self.limit.as_deref() else {
            return Ok(NonZeroUsize::new(DEFAULT_LOG_LIMIT).unwrap_or(NonZeroUsize::MIN));
        };
        raw.trim()
            .parse::<NonZeroUsize>()
            .map_err(|_| ApiError::BadRequest(format!("limit must be a positive integer, got '{}'", raw)))
    }
}

/// Response of `GET /api/logs`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<LogRecord>,
}

/// Catalogue entry of `GET /api/agents`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
}

impl From<AgentKind> for AgentInfo {
    fn from(kind: AgentKind) -> Self {
        Self {
            name: kind.as_str().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// Response of `GET /api/agents`.
#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub available_agents: Vec<AgentInfo>,
    pub running_agents: Vec<RunningTask>,
}

/// Workspace location and configured LLM names.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        workspace_path: state.workspace_path.clone(),
        llm_models: state.llm_models.clone(),
    })
}

/// Most recent log records, oldest first.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    let limit = query.limit()?;
    Ok(Json(LogsResponse {
        logs: state.logs.recent(limit),
    }))
}

/// Agent catalogue and currently running tasks.
pub async fn get_agents(State(state): State<Arc<AppState>>) -> Json<AgentsResponse> {
    Json(AgentsResponse {
        available_agents: AgentKind::ALL.into_iter().map(AgentInfo::from).collect(),
        running_agents: state.registry.list_running(),
    })
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
