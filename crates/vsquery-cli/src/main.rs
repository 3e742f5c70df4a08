//! Main entry point for the vsquery CLI

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use vsquery_cli::cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configure color-eyre with custom settings
    // Disable location display (file paths and line numbers)
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    // stdout carries the JSON payload only, so logging stays off unless asked for
    let binary_name = env!("CARGO_BIN_NAME").replace('-', "_");
    let default_filter = format!("{binary_name}=warn,vsquery_cli=warn,vsquery_sdk=warn");
    vsquery_common::logging::init_cli_logging(&args.verbosity, &default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    // Run and propagate errors as eyre::Report
    Ok(args.run().await?)
}
