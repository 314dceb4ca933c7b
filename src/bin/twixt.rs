//! Twixt CLI - play, train and evaluate Twixt agents
//!
//! This CLI provides a unified interface for:
//! - Playing interactive games against a person, minimax or a trained agent
//! - Training the Q-learning agent
//! - Evaluating a trained agent against random play and minimax

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "twixt")]
#[command(version, about = "Twixt with minimax and Q-learning agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game in the terminal
    Play(twixt::cli::commands::play::PlayArgs),

    /// Train the Q-learning agent
    Train(Box<twixt::cli::commands::train::TrainArgs>),

    /// Evaluate a trained agent
    Evaluate(twixt::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => twixt::cli::commands::play::execute(args),
        Commands::Train(args) => twixt::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => twixt::cli::commands::evaluate::execute(args),
    }
}
