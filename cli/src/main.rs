//! CLI entrypoint for relay-tally
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;

use anyhow::Result;
use app::App;
use clap::Parser;
use tally_infrastructure::ConfigLoader;
use tally_presentation::Cli;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting relay-tally");

    let app = App::init(&cli)?;
    let report = app.run().await?;
    let output = app.render(&report);
    app.teardown();

    if report.published.is_none() {
        info!("No relay returned any contributor");
    }

    // An unpublished count leaves stdout untouched
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
