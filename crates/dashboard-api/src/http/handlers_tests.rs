use super::*;
use crate::test_support::test_state;

use dashboard_core::TaskHandle;
use dashboard_protocols::LogLevel;

use crate::test_support::EchoAgent;

fn query(limit: Option<&str>) -> Query<LogsQuery> {
    Query(LogsQuery {
        limit: limit.map(str::to_string),
    })
}

#[tokio::test]
async fn test_get_config() {
    let state = test_state();
    let Json(response) = get_config(State(state)).await;

    assert_eq!(response.workspace_path, PathBuf::from("/srv/openmanus/workspace"));
    assert_eq!(response.llm_models, vec!["default", "vision"]);
}

#[tokio::test]
async fn test_get_logs_default_limit() {
    let state = test_state();
    for i in 0..150 {
        state.logs.append(LogRecord::info(format!("line {}", i)));
    }

    let Json(response) = get_logs(State(state), query(None)).await.unwrap();
    assert_eq!(response.logs.len(), DEFAULT_LOG_LIMIT);
    assert_eq!(response.logs[0].message, "line 50");
    assert_eq!(response.logs[99].message, "line 149");
}

#[tokio::test]
async fn test_get_logs_limit_larger_than_store() {
    let state = test_state();
    state.logs.append(LogRecord::new(LogLevel::Warning, "only one"));

    let Json(response) = get_logs(State(state), query(Some("500"))).await.unwrap();
    assert_eq!(response.logs.len(), 1);
    assert_eq!(response.logs[0].level, LogLevel::Warning);
}

#[tokio::test]
async fn test_get_logs_rejects_zero_and_garbage() {
    for bad in ["0", "-3", "ten", ""] {
        let err = get_logs(State(test_state()), query(Some(bad)))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)), "limit {:?}", bad);
    }
}

#[tokio::test]
async fn test_get_agents_catalogue() {
    let state = test_state();
    let Json(response) = get_agents(State(state)).await;

    let names: Vec<&str> = response
        .available_agents
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["Manus", "BrowserAgent", "MCPAgent", "DataAnalysis"]);
    assert!(response.available_agents.iter().all(|a| !a.description.is_empty()));
    assert!(response.running_agents.is_empty());
}

#[tokio::test]
async fn test_get_agents_lists_running_tasks() {
    let state = test_state();
    state
        .registry
        .register(TaskHandle::new(
            "Manus_7",
            Arc::new(EchoAgent(AgentKind::Manus)),
        ))
        .unwrap();

    let Json(response) = get_agents(State(state)).await;
    assert_eq!(response.running_agents.len(), 1);
    assert_eq!(response.running_agents[0].id, "Manus_7");
    assert_eq!(response.running_agents[0].kind, AgentKind::Manus);

    let json = serde_json::to_value(&response.running_agents).unwrap();
    assert_eq!(json[0]["type"], "Manus");
    assert!(json[0]["started_at"].is_string());
}
