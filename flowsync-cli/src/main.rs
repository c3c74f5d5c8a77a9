//! Flowsync — push workflow definitions from a repository to an
//! orchestration service.
//!
//! # Usage
//!
//! ```text
//! flowsync sync --server <host:port> --protocol http|https --namespace <ns> --sync <path>
//!               [--token <bearer>] [--force] [--dry-run] [--keep-going]
//!               [--from-rev HEAD^] [--to-rev HEAD] [--timeout-secs 30] [--json]
//! ```
//!
//! Every flag except `--json` can also be supplied as a CI input variable
//! (`INPUT_SERVER`, `INPUT_PROTOCOL`, ...).

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "flowsync",
    version,
    about = "Create and update orchestration workflows from definitions in a repository",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the remote namespace with local workflow files.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
    }
}
