use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_log_analytics::cli::{Cli, run};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON output, so logs go to stderr
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    run(cli)
}
