//! CLI application for rasterizing PDF pages to JPEG.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{batch, config, extract};
use pdfshot_core::PdfshotConfig;

/// pdfshot - Render PDF pages to JPEG images in parallel
#[derive(Parser)]
#[command(name = "pdfshot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract pages of a single PDF
    Extract(extract::ExtractArgs),

    /// Extract pages of every PDF matching a pattern
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The config command must work even when the file on disk is broken
    let config = match cli.command {
        Commands::Config(_) => PdfshotConfig::default(),
        _ => commands::load_config(cli.config.as_deref())?,
    };

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, config).await,
        Commands::Batch(args) => batch::run(args, config).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
