//! OXO CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game at the terminal
//! - pit: Strategy-vs-strategy match series

mod pit_cmd;
mod play_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oxo")]
#[command(about = "Tic-tac-toe with three computer opponents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play at the terminal, against the computer or another human
    Play(play_cmd::PlayArgs),
    /// Pit two strategies against each other over a series of games
    Pit(pit_cmd::PitArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Pit(args) => pit_cmd::run(args),
    }
}
