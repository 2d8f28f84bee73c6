//! Pasture CLI - Command-line interface
//!
//! Commands:
//! - simulate: the machine plays both sides
//! - play: a human (Red) against the machine (Blue)

mod play;
mod render;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use play::PlayArgs;
use simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "pasture")]
#[command(about = "Two-player herd-splitting game on a hexagonal board")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the machine play both sides
    Simulate(SimulateArgs),
    /// Play Red against the machine
    Play(PlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean; RUST_LOG controls the level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args),
        Commands::Play(args) => play::run(args),
    }
}
