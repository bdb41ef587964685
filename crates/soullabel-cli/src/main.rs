use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "soullabel", version, about = "Soul Label personality quiz")]
struct Cli {
    /// Use this config file instead of ~/.config/soullabel/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the quiz interactively
    Play(commands::play::PlayArgs),
    /// Run a whole session non-interactively and print the outcome
    Simulate(commands::simulate::SimulateArgs),
    /// List the configured questions and result tags
    Questions {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("SOULLABEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(config, args),
        Commands::Simulate(args) => commands::simulate::run(config, args),
        Commands::Questions { json } => commands::questions::run(config, json),
        Commands::Config { action } => commands::config::run(config, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
