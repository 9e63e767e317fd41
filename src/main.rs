// Reelbox - command-driven video player
// Loads a catalog, then reads commands from stdin until EXIT

use anyhow::{Context, Result};
use clap::Parser;
use reelbox::{Catalog, Config, Console, VideoLibrary, VideoPlayer};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelbox")]
#[command(about = "Play, flag, search and organise videos from a catalog")]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog file, overriding the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for PLAY_RANDOM
    #[arg(long)]
    seed: Option<u64>,

    /// Enable developer logging (stderr instead of the log file)
    #[arg(long)]
    dev: bool,
}

fn init_logging(config: &Config, dev: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    // stdout carries the command output, so logs never go there
    if dev {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(true)
            .with_env_filter(filter)
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(&config.logging.directory).with_context(|| {
        format!(
            "Failed to create log directory {}",
            config.logging.directory.display()
        )
    })?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&config.logging.directory, "reelbox.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    Ok(Some(guard))
}

fn load_catalog(path: Option<&Path>) -> Result<VideoLibrary> {
    let library = match path {
        Some(path) => VideoLibrary::load(path)?,
        None => VideoLibrary::builtin()?,
    };
    Ok(library)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if args.catalog.is_some() {
        config.catalog_path = args.catalog.clone();
    }
    if args.seed.is_some() {
        config.playback.random_seed = args.seed;
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config, args.dev)?;
    info!("Reelbox starting up");

    let library = load_catalog(config.catalog_path.as_deref())?;
    info!("Catalog ready with {} videos", library.len());

    let mut player = VideoPlayer::new(library)
        .with_default_flag_reason(config.playback.default_flag_reason.clone());
    if let Some(seed) = config.playback.random_seed {
        player = player.with_seed(seed);
    }

    let stdin = io::stdin();
    let mut console = Console::new(player, stdin.lock(), io::stdout());
    console.run()?;

    info!("Reelbox shutting down");
    Ok(())
}
