//! OpenManus Dashboard
//!
//! Serves the observer WebSocket and the JSON API for launching and watching
//! agent tasks.

mod cli;
mod server;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    server::run(cli).await
}
