//! Murmure CLI entry point.

use anyhow::Result;
use clap::Parser;
use murmure::cli::{preflight, Cli, Output};
use murmure::config::Settings;
use murmure::orchestrator::Orchestrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("murmure={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Fail fast on missing credentials or tools
    if let Err(e) = preflight::check() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings, cli.refine)?;
    orchestrator.run().await?;

    // Individual file failures are reported inside the run and do not
    // change the exit code.
    Ok(())
}
