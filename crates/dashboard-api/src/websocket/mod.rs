//! WebSocket interface module.

mod handler;

pub use handler::{handle_payload, ws_handler, RECENT_LOGS_REPLAY, WELCOME_MESSAGE};
