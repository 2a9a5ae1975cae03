//! Startup logic for the dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard_api::{AppState, DashboardServer, DashboardServerConfig};
use dashboard_config::{Config, ConfigLoader, ConfigValidator};
use dashboard_core::{EventBus, LogCaptureLayer, LogStore, TaskRegistry};
use dashboard_protocols::LogLevel;
use dashboard_runtime::{AgentDispatch, TaskRunner};

use crate::cli::Cli;

/// Per-user state directory, `~/.openmanus`.
pub(crate) fn openmanus_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".openmanus"))
        .unwrap_or_else(|| PathBuf::from(".openmanus"))
}

/// Initialize tracing with console, file and log store output.
///
/// Log files are written to ~/.openmanus/logs/ with daily rotation. Events at
/// or above `capture_level` are also appended to `logs`.
pub(crate) fn init_tracing(logs: Arc<LogStore>, capture_level: LogLevel) -> anyhow::Result<()> {
    let log_dir = openmanus_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dashboard")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(LogCaptureLayer::new(logs, capture_level))
        .try_init()?;

    Ok(())
}

/// Wire the shared components together.
pub(crate) fn build_state(config: &Config, logs: Arc<LogStore>, workspace: PathBuf) -> Arc<AppState> {
    let bus = Arc::new(EventBus::with_buffer(config.dashboard.observer_buffer));
    let registry = Arc::new(TaskRegistry::new());
    let dispatch = AgentDispatch::from_config(config, &workspace);
    let runner = Arc::new(TaskRunner::new(bus.clone(), registry.clone(), dispatch));

    Arc::new(AppState::new(
        bus,
        logs,
        registry,
        runner,
        workspace,
        config.llm_models(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Load configuration, start logging and serve until Ctrl-C.
pub(crate) async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);

    let capture_level = config.dashboard.capture_level()?;
    let logs = Arc::new(LogStore::new(config.dashboard.log_capacity));
    init_tracing(logs.clone(), capture_level)?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config {}: {}", e.path, e.message);
        }
        anyhow::bail!(
            "Invalid configuration: {} error(s) in {}",
            validation.errors.len(),
            cli.config.display()
        );
    }

    let workspace = config.workspace.root_path();
    std::fs::create_dir_all(&workspace)
        .with_context(|| format!("Failed to create workspace {}", workspace.display()))?;
    info!("Workspace: {}", workspace.display());

    let state = build_state(&config, logs, workspace);
    let configured = state.runner.dispatch().configured_kinds();
    if configured.is_empty() {
        warn!("No agents configured; every start request will fail");
    } else {
        info!("Configured agents: {:?}", configured);
    }

    let _forwarder = state.logs.forward_to(state.bus.clone());

    let server = DashboardServer::new(
        DashboardServerConfig::new(config.server.host.clone(), config.server.port),
        state,
    );
    info!("Starting dashboard on http://{}", server.addr());
    server
        .run(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
