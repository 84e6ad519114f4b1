use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::engine::{DocumentIndex, SearchEngine};
use crate::indexer::Indexer;
use crate::storage::{SnapshotStore, data_dir};
use crate::tui;

#[derive(Parser)]
#[command(name = "notefind")]
#[command(version)]
#[command(about = "Incrementally indexed full-text search over your notes", long_about = None)]
pub struct Cli {
    /// Alternate config file location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Notes root to scan, overriding the config file
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one synchronization pass and exit
    Reindex,
    /// Show statistics about the stored snapshot
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;

    match &cli.command {
        Some(Commands::Reindex) => run_reindex(&cli),
        Some(Commands::Stats) => show_stats(&cli),
        None => run_tui(&cli),
    }
}

/// The interactive session logs to a file - stderr would corrupt the
/// alternate screen. Subcommands log to stderr as usual.
fn init_logging(interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if interactive {
        let path = data_dir()?.join("notefind.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_deref(), cli.root.clone())
}

/// Open the engine (fatal on failure - nothing works without a handle) and
/// wire it to the snapshot store.
fn build_indexer(config: &Config) -> Result<Arc<Indexer>> {
    let store_path = data_dir()?.join("index").join("documents.json");
    let engine: Arc<dyn SearchEngine> =
        Arc::new(DocumentIndex::open_at(store_path).context("Failed to open index")?);
    let store = SnapshotStore::open_default()?;
    Ok(Arc::new(Indexer::new(config, engine, store)))
}

fn run_tui(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let indexer = build_indexer(&config)?;

    // Bring the index up to date before the first frame; later refreshes
    // run in the background on Ctrl+R.
    let summary = indexer.reindex().context("Failed to synchronize index")?;
    info!(
        indexed = summary.indexed,
        removed = summary.removed,
        skipped = summary.skipped,
        "startup synchronization complete"
    );

    let result = tui::run_interactive(Arc::clone(&indexer), &config);
    indexer.close_index()?;
    result
}

fn run_reindex(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let indexer = build_indexer(&config)?;

    let summary = indexer.reindex()?;
    indexer.close_index()?;

    println!(
        "Indexed {} documents, removed {}, skipped {}",
        summary.indexed, summary.removed, summary.skipped
    );
    Ok(())
}

fn show_stats(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let snapshot = SnapshotStore::open_default()?.load()?;

    println!("notefind snapshot");
    println!("=================");
    println!("Notes root: {}", config.root_path.display());
    println!("Indexed files: {}", snapshot.len());

    if let Some(newest) = snapshot.iter().map(|r| r.mod_time).max() {
        println!("Newest: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(oldest) = snapshot.iter().map(|r| r.mod_time).min() {
        println!("Oldest: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
