//! qgrid CLI - train and replay tabular Q-learning agents on a grid world

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qgrid")]
#[command(version, about = "Tabular Q-learning on a deterministic grid world", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table and optionally persist it
    Train(qgrid::cli::commands::train::TrainArgs),

    /// Replay the greedy policy from a saved table
    Play(qgrid::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qgrid::cli::commands::train::execute(args),
        Commands::Play(args) => qgrid::cli::commands::play::execute(args),
    }
}
