// batchpress-cli/src/main.rs
//
// Entry point for the Batchpress command-line interface.
//
// Responsibilities:
// - Parsing command-line arguments (see cli.rs)
// - Dispatching to the subcommand implementations (see commands/)
// - Translating fatal errors into a styled message and a non-zero exit code

use clap::Parser;
use colored::Colorize;
use std::process;

mod cli;
mod commands;
mod logging;
mod terminal;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode(args) => commands::encode::run_encode(args, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
