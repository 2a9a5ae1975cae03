//! Inbound observer commands.
//!
//! Commands arrive as single text payloads:
//!
//! ```text
//! RUN:<agent_type>|<prompt>
//! GET_LOGS
//! ```
//!
//! Anything else does not parse and is dropped by the gateway.

const RUN_PREFIX: &str = "RUN:";
const GET_LOGS: &str = "GET_LOGS";

/// A parsed observer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a task. `kind` is kept verbatim so unknown kinds can be reported.
    Start { kind: String, prompt: String },

    /// Send the most recent log records to the requesting observer.
    FetchRecentLogs,
}

impl Command {
    /// Parse a payload. Returns `None` for malformed or unrecognized input.
    pub fn parse(payload: &str) -> Option<Self> {
        if payload == GET_LOGS {
            return Some(Self::FetchRecentLogs);
        }

        let rest = payload.strip_prefix(RUN_PREFIX)?;
        let (kind, prompt) = rest.split_once('|')?;
        Some(Self::Start {
            kind: kind.to_string(),
            prompt: prompt.to_string(),
        })
    }
}
