//! essync: Queue-to-Elasticsearch Sync Worker
//!
//! CLI entry point for running the worker against a queue event file and
//! managing its configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use essync::Config;

mod commands;

#[derive(Parser)]
#[command(name = "essync")]
#[command(about = "Queue-to-Elasticsearch sync worker")]
#[command(version)]
struct Cli {
    /// Configuration file path (falls back to ELASTICSEARCH_* environment
    /// variables when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a queue event file and print the handler response
    Process {
        /// Path to a queue event JSON file
        event: PathBuf,

        /// Also print the per-record report as JSON
        #[arg(long)]
        report: bool,
    },

    /// Build a change notification envelope and print its message body
    Emit {
        /// Document JSON (must carry an "id")
        doc: String,

        /// Emit a delete notification instead of an upsert
        #[arg(long)]
        delete: bool,
    },

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(default_value = "essync.toml")]
        path: PathBuf,
    },

    /// Load the configuration and report what resolved
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process { event, report } => {
            let config = load_config(cli.config.as_deref())?;
            commands::process_event(&config, &event, report)
        }
        Commands::Emit { doc, delete } => commands::emit_message(&doc, delete),
        Commands::Init { path } => commands::init_config(&path),
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            commands::check_config(&config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::from_env(),
    }
}
