//! mkstar CLI - Material MkDocs to Starlight converter.
//!
//! Provides commands for:
//! - `convert`: Migrate every configured section
//! - `transform`: Convert a single markdown file to stdout

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, TransformArgs};
use output::Output;

/// mkstar - Convert Material MkDocs markdown to Starlight.
#[derive(Parser)]
#[command(name = "mkstar", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert all configured documentation sections.
    Convert(ConvertArgs),
    /// Convert one markdown file (or stdin) and print the result.
    Transform(TransformArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Transform(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
