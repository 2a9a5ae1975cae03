//! # Dashboard API
//!
//! External interface of the dashboard:
//! - **WebSocket** (`/ws`): observers start tasks and receive events
//! - **HTTP** (`/api/*`, `/health`): read-only JSON views of the state

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod websocket;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{DashboardServer, DashboardServerConfig};
pub use state::AppState;
pub use websocket::{WELCOME_MESSAGE, ws_handler};

#[cfg(test)]
mod test_support;
