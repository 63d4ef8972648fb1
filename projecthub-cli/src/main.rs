mod cli;
mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::HubConfig::load()?;
    commands::run(cli, config)
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG` wins
/// over the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
