//! Error types for the dashboard protocol layer.

mod agent;

pub use agent::*;
