//! Command-line interface wiring for the `spiredeck` binary.
//!
//! This module owns the clap definitions and delegates execution to the
//! submodule handling each command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod summary;
pub mod tally;
pub mod utils;

/// Parsed CLI entrypoint for the `spiredeck` binary.
#[derive(Parser, Debug)]
#[command(
    name = "spiredeck",
    version,
    about = "Tally card energy costs and write a deck report"
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a deck file and write a report artifact.
    Tally(tally::TallyArgs),
    /// Parse a deck file and print the report to stdout.
    Summary(summary::SummaryArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Tally(args) => tally::handle(args),
        Command::Summary(args) => summary::handle(args),
    }
}
