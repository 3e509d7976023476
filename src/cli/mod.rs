//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod lookup;
pub mod repl;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Map markers with reverse-geocoded popups
#[derive(Parser)]
#[command(name = "geopin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at info level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reverse geocode a coordinate
    Lookup(lookup::LookupArgs),

    /// Find your own position and its address
    Locate(locate::LocateArgs),

    /// Interactive map session
    Repl(repl::ReplArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lookup(args) => lookup::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Repl(args) => repl::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
