//! treesync CLI
//!
//! Replays recorded update streams through the sync engine

use clap::{Parser, Subcommand};
use treesync_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "treesync")]
#[command(about = "treesync - Replay and inspect incremental tree update logs", long_about = None)]
struct Cli {
    /// Emit JSON logs on stderr instead of human readable ones
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply every update in a log and print the reports and final tree
    Replay(commands::replay::ReplayArgs),
    /// Apply every update in a log and print only the final digest
    Digest(commands::digest::DigestArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Replay(args) => commands::replay::execute(args),
        Commands::Digest(args) => commands::digest::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
