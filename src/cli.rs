//! CLI definitions for the dashboard.

use std::path::PathBuf;

use clap::Parser;

use dashboard_config::Config;

/// OpenManus dashboard server.
#[derive(Debug, Parser)]
#[command(name = "openmanus-dashboard")]
#[command(about = "Real-time control plane for OpenManus agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path. A missing file means defaults.
    #[arg(
        short,
        long,
        default_value = "config/dashboard.toml",
        env = "OPENMANUS_DASHBOARD_CONFIG"
    )]
    pub config: PathBuf,

    /// Server host (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port (overrides `server.port`)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
