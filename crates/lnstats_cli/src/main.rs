//! lnstats CLI
//!
//! Builds and maintains a CSV dataset of Bitcoin Lightning Network statistics.
//!
//! # Commands
//!
//! - `sync` - Append any new records from mempool.space (default)
//! - `inspect` - Display row count, watermark and size of the dataset
//! - `verify` - Check every row of the dataset
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use lnstats_sync::DEFAULT_STORE_PATH;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lightning Network statistics dataset builder.
#[derive(Parser)]
#[command(name = "lnstats")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the dataset file
    #[arg(global = true, short, long, env = "LNSTATS_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append new records from the remote source
    Sync(commands::sync::SyncArgs),

    /// Display dataset statistics
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify the dataset's format and ordering
    Verify,

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", error_message(e.as_ref()));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        None => commands::sync::run(&cli.store, &commands::sync::SyncArgs::default())?,
        Some(Commands::Sync(args)) => commands::sync::run(&cli.store, &args)?,
        Some(Commands::Inspect { format }) => commands::inspect::run(&cli.store, &format)?,
        Some(Commands::Verify) => commands::verify::run(&cli.store)?,
        Some(Commands::Version) => {
            println!("lnstats v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Formats a failure for the terminal.
fn error_message(error: &dyn Error) -> String {
    format!("Error: {error}")
}
