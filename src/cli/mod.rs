//! CLI parser and dispatch.

mod icons;
mod search;
mod sources;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use eventscout::config::resolve_config_path;
use eventscout::pipeline::DEFAULT_MAX_EVENTS;
use eventscout::EventConfig;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Find this weekend's local events")]
#[command(version)]
pub struct Cli {
    /// Config file path (default: $EVENTSCOUT_CONFIG or config/event_sources.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run every discovery tier and print the candidates
    Search {
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
        /// Show how each source and query fared
        #[arg(long)]
        report: bool,
    },

    /// Search, then rank candidates into notification events
    Digest {
        /// Maximum number of events
        #[arg(short, long, default_value_t = DEFAULT_MAX_EVENTS)]
        max: usize,
        /// Print the digest as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the reference link footer
    References,

    /// List configured sources and which tiers are available
    Sources,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let path = resolve_config_path(cli.config.as_deref());
    let config = Arc::new(EventConfig::load(&path));

    match cli.command {
        Commands::Search { json, report } => search::cmd_search(config, json, report).await,
        Commands::Digest { max, json } => search::cmd_digest(config, max, json).await,
        Commands::References => sources::cmd_references(&config),
        Commands::Sources => sources::cmd_sources(&config, &path),
    }
}
