//! barbermap CLI - Command-line interface
//!
//! This binary provides a command-line interface to the barbermap library:
//! an interactive terminal session (`run`) and a one-shot search (`search`).

mod commands;
mod error;
mod tui_app;
mod ui;

use clap::{Parser, Subcommand};

use commands::{run, search};

#[derive(Parser)]
#[command(name = "barbermap")]
#[command(version = barbermap::VERSION)]
#[command(about = "Find barbershops near you", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive discovery session with live map snapshots
    Run(run::RunArgs),
    /// One-shot search, printed to stdout
    Search(search::SearchArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run::run(args),
        Command::Search(args) => search::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
