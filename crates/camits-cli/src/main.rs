mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "camits", about = "Camera capture conversion and chart localization")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Processing config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads for parallel stages (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show capture sidecar and camera property metadata
    Info(commands::info::InfoArgs),
    /// Convert a capture to an RGB image file
    Convert(commands::convert::ConvertArgs),
    /// Write each channel plane of a capture as an image
    Planes(commands::planes::PlanesArgs),
    /// Print per-channel statistics and sharpness of an image
    Stats(commands::stats::StatsArgs),
    /// Find the reference chart in a scene
    Locate(commands::locate::LocateArgs),
    /// Print or save the default processing config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Convert(args) => commands::convert::run(args, &config),
        Commands::Planes(args) => commands::planes::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Locate(args) => commands::locate::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
