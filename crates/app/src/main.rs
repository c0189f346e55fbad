//! Paragon finance client - Main Entry Point
//!
//! Thin CLI over the client library: authenticate, log receipts, and
//! fetch the aggregated summaries the web UI renders as charts.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paragon=info")),
        )
        .with_target(false)
        .init();

    cli::Cli::parse().run().await
}
