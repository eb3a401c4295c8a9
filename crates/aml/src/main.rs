//! aml CLI - Google Doc to ArchieML JSON.
//!
//! Provides commands for:
//! - `fetch`: Export a Google Doc and write its data as JSON
//! - `authorize`: Authorize access to Google Drive and cache the token
//! - `convert`: Convert a previously exported HTML file offline

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AuthorizeArgs, ConvertArgs, FetchArgs};
use output::Output;

/// aml - Google Doc to ArchieML JSON.
#[derive(Parser)]
#[command(name = "aml", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the configured Google Doc and write it as JSON.
    Fetch(FetchArgs),
    /// Authorize Google Drive access and store the token.
    Authorize(AuthorizeArgs),
    /// Convert an exported HTML file to JSON.
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fetch(args) => args.execute(),
        Commands::Authorize(args) => args.execute(),
        Commands::Convert(args) => args.execute(),
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
