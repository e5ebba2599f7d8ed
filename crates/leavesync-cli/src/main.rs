use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "leavesync-cli", version, about = "Leavesync CLI")]
struct Cli {
    /// Config file (defaults to ~/.config/leavesync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every mergeable interval in a collection
    Compress(commands::interval::InputArgs),
    /// Break intervals with half-day ends into atomic pieces
    Split(commands::interval::InputArgs),
    /// Show what to add to and remove from a baseline collection
    Diff(commands::interval::DiffArgs),
    /// Combine two collections
    Union(commands::interval::UnionArgs),
    /// Plan a sync from raw source records to target bookings
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leavesync_core=info,leavesync_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Compress(args) => commands::interval::compress(args),
        Commands::Split(args) => commands::interval::split(args),
        Commands::Diff(args) => commands::interval::diff(args),
        Commands::Union(args) => commands::interval::union(args),
        Commands::Plan(args) => commands::plan::run(args, config),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
