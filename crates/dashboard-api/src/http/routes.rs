//! HTTP route definitions.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::http::{handlers, monitoring};
use crate::state::AppState;
use crate::websocket::ws_handler;

/// Create the dashboard router.
///
/// ```text
/// GET /ws           - observer connection
/// GET /api/config   - workspace path and LLM names
/// GET /api/logs     - recent log records (?limit=N, default 100)
/// GET /api/agents   - agent catalogue and running tasks
/// GET /health       - liveness and counters
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/config", get(handlers::get_config))
        .route("/logs", get(handlers::get_logs))
        .route("/agents", get(handlers::get_agents));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(monitoring::health_check))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
