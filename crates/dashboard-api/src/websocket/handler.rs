//! Observer connection gateway.
//!
//! Every connection joins the event bus, is greeted with a plain text
//! welcome, and then exchanges text frames:
//!
//! ```text
//! client -> server   RUN:<agent_type>|<prompt>
//!                    GET_LOGS
//! server -> client   LOG:|STATUS:|RESULT:|ERROR:<message>
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use dashboard_protocols::{Command, DashboardEvent};

use crate::state::AppState;

/// Greeting sent to every new observer.
pub const WELCOME_MESSAGE: &str = "Connected to OpenManus Dashboard";

/// Records replayed for `GET_LOGS`.
pub const RECENT_LOGS_REPLAY: usize = 50;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (observer, mut rx) = state.bus.join();
    info!("Observer connected: {}", observer);

    let (mut sender, mut receiver) = socket.split();

    if sender
        .send(Message::Text(WELCOME_MESSAGE.into()))
        .await
        .is_err()
    {
        state.bus.leave(&observer);
        debug!("Observer {} gone before welcome", observer);
        return;
    }

    // Outbound pump
    let pump_id = observer.clone();
    let pump = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                debug!("Send to observer {} failed", pump_id);
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => handle_payload(&state, &observer, text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Receive from observer {} failed: {}", observer, e);
                break;
            }
        }
    }

    state.bus.leave(&observer);
    pump.abort();
    info!("Observer disconnected: {}", observer);
}

/// Act on one inbound payload from `observer`. Unrecognized payloads are dropped.
pub async fn handle_payload(state: &Arc<AppState>, observer: &str, payload: &str) {
    match Command::parse(payload) {
        Some(Command::Start { kind, prompt }) => {
            // Runs detached; progress reaches the observer through the bus.
            state.runner.spawn(observer.to_string(), kind, prompt);
        }
        Some(Command::FetchRecentLogs) => {
            let limit = NonZeroUsize::new(RECENT_LOGS_REPLAY).unwrap_or(NonZeroUsize::MIN);
            for record in state.logs.recent(limit) {
                let event = DashboardEvent::log(record.message);
                if !state.bus.send_to(observer, event.to_string()).await {
                    break;
                }
            }
        }
        None => debug!("Ignored payload from {}: {:?}", observer, payload),
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
