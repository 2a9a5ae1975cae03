use super::*;

fn shell(script: &str) -> AgentCommandConfig {
    AgentCommandConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        ..Default::default()
    }
}

fn agent(spec: AgentCommandConfig) -> ProcessAgent {
    ProcessAgent::new(AgentKind::Manus, spec, std::env::temp_dir())
}

#[tokio::test]
async fn test_prompt_round_trips_through_stdin() {
    let agent = agent(shell("cat"));
    let result = agent.run("summarize the report").await.unwrap();
    assert_eq!(result, "summarize the report");
}

#[tokio::test]
async fn test_output_is_trimmed() {
    let agent = agent(shell("printf '\\n  done  \\n\\n'"));
    assert_eq!(agent.run("x").await.unwrap(), "done");
}

#[tokio::test]
async fn test_environment_is_passed() {
    let mut spec = shell("echo \"$DASHBOARD_AGENT_KIND:$GREETING\"");
    spec.env.insert("GREETING".to_string(), "hello".to_string());

    let agent = ProcessAgent::new(AgentKind::Browser, spec, std::env::temp_dir());
    assert_eq!(agent.run("").await.unwrap(), "BrowserAgent:hello");
}

#[tokio::test]
async fn test_working_dir_defaults_to_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let agent = ProcessAgent::new(AgentKind::Manus, shell("pwd"), dir.path().to_path_buf());

    let result = agent.run("").await.unwrap();
    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(std::path::Path::new(&result).canonicalize().unwrap(), expected);
}

#[tokio::test]
async fn test_nonzero_exit_fails_with_stderr() {
    let agent = agent(shell("echo 'model unavailable' >&2; exit 3"));
    let err = agent.run("x").await.unwrap_err();

    match err {
        AgentError::ExecutionFailed(message) => {
            assert!(message.contains("exit code 3"));
            assert!(message.contains("model unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_child_ignoring_stdin_still_succeeds() {
    let agent = agent(shell("echo ok"));
    let prompt = "p".repeat(256 * 1024);
    assert_eq!(agent.run(&prompt).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_timeout() {
    let mut spec = shell("sleep 5");
    spec.timeout_seconds = Some(1);

    let err = agent(spec).run("x").await.unwrap_err();
    assert!(matches!(err, AgentError::Timeout(1)));
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let spec = AgentCommandConfig {
        command: "/nonexistent/openmanus-agent".to_string(),
        ..Default::default()
    };
    let err = agent(spec).run("x").await.unwrap_err();
    assert!(matches!(err, AgentError::Spawn(_)));
}

#[tokio::test]
async fn test_cleanup_without_command_is_noop() {
    assert!(agent(shell("true")).cleanup().await.is_ok());
}

#[tokio::test]
async fn test_cleanup_command_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("cleaned");
    let mut spec = shell("true");
    spec.cleanup_command = Some(vec![
        "touch".to_string(),
        marker.to_string_lossy().into_owned(),
    ]);

    agent(spec).cleanup().await.unwrap();
    assert!(marker.exists());
}

#[tokio::test]
async fn test_cleanup_failure() {
    let mut spec = shell("true");
    spec.cleanup_command = Some(vec!["false".to_string()]);

    let err = agent(spec).cleanup().await.unwrap_err();
    assert!(matches!(err, AgentError::CleanupFailed(_)));
}

#[tokio::test]
async fn test_hanging_cleanup_is_bounded_by_timeout() {
    let mut spec = shell("true");
    spec.timeout_seconds = Some(1);
    spec.cleanup_command = Some(vec!["sleep".to_string(), "30".to_string()]);

    let started = std::time::Instant::now();
    let err = agent(spec).cleanup().await.unwrap_err();

    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    assert!(matches!(err, AgentError::CleanupFailed(ref m) if m.contains("timed out after 1s")));
}

#[tokio::test]
async fn test_builder_rejects_blank_command() {
    let builder = ProcessAgentBuilder::new(
        AgentCommandConfig {
            command: " ".to_string(),
            ..Default::default()
        },
        std::env::temp_dir(),
    );
    let err = builder.build(AgentKind::Mcp).await.err().unwrap();
    assert!(matches!(err, AgentError::NotConfigured(ref k) if k == "MCPAgent"));
}

#[tokio::test]
async fn test_builder_yields_agent_of_requested_kind() {
    let builder = ProcessAgentBuilder::new(shell("cat"), std::env::temp_dir());
    let agent = builder.build(AgentKind::DataAnalysis).await.unwrap();
    assert_eq!(agent.kind(), AgentKind::DataAnalysis);
    assert_eq!(agent.run("rows").await.unwrap(), "rows");
}
