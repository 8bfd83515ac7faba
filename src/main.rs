//! sdf-pipeline main entry point
//!
//! This is the command-line interface for the collector and fetcher stages.

use clap::{Parser, ValueEnum};
use sdf_pipeline::config::{load_config_with_hash, validate_name, Config, ProjectLayout};
use sdf_pipeline::crawler::{collect, fetch, PageFetchClient};
use sdf_pipeline::output::{load_history, print_history, StatusMessage};
use sdf_pipeline::plugin::{PluginKey, PluginRegistry};
use sdf_pipeline::storage::{PageCache, SqliteLedger};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pipeline stage to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Walk the depth spec and write the collected URL list
    #[value(alias = "url_collector")]
    Collect,

    /// Fetch every URL in the collected list
    #[value(alias = "url_fetcher")]
    Fetch,

    /// Extraction stage (not available)
    #[value(alias = "url_extractor")]
    Extract,

    /// Show recorded collector runs for the pair
    History,
}

/// sdf-pipeline: a depth-driven scraping pipeline
///
/// Collects URLs for a (site, project) pair by walking a YAML depth spec,
/// then fetches every collected URL through the pair's fetch plugin.
#[derive(Parser, Debug)]
#[command(name = "sdf-pipeline")]
#[command(version = "1.0.0")]
#[command(about = "A depth-driven scraping pipeline", long_about = None)]
struct Cli {
    /// Stage to run
    #[arg(value_enum)]
    mode: Mode,

    /// Project name
    project: String,

    /// Site name
    site: String,

    /// Path to TOML pipeline configuration
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    validate_name("project", &cli.project)?;
    validate_name("site", &cli.site)?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration given, using defaults");
            Config::default()
        }
    };

    let key = PluginKey::new(&cli.site, &cli.project);
    let layout = ProjectLayout::from_config(&config, key);

    match cli.mode {
        Mode::Collect => handle_collect(&config, layout).await?,
        Mode::Fetch => handle_fetch(&config, layout).await?,
        Mode::Extract => handle_extract(&layout),
        Mode::History => handle_history(&layout)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for status messages.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sdf_pipeline=info,warn"),
            1 => EnvFilter::new("sdf_pipeline=debug,info"),
            2 => EnvFilter::new("sdf_pipeline=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the plugin registry shared by both stages
fn build_registry(
    config: &Config,
    layout: &ProjectLayout,
) -> Result<PluginRegistry, Box<dyn std::error::Error>> {
    let cache = PageCache::new(layout.cache_dir());
    let client = PageFetchClient::new(&config.http, cache)?;
    Ok(PluginRegistry::from_config(config, &client))
}

/// Handles the collect mode
async fn handle_collect(
    config: &Config,
    layout: ProjectLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = build_registry(config, &layout)?;

    if let Some(summary) = collect(layout, &registry).await? {
        tracing::info!(
            "Collected {} URLs in {} plugin calls ({} failed)",
            summary.stats.collected,
            summary.stats.calls,
            summary.stats.failed
        );
    }

    Ok(())
}

/// Handles the fetch mode
async fn handle_fetch(
    config: &Config,
    layout: ProjectLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = build_registry(config, &layout)?;

    if let Some(summary) = fetch(layout, &registry).await? {
        tracing::info!(
            "Fetched {} URLs, {} succeeded",
            summary.fetched,
            summary.succeeded
        );
    }

    Ok(())
}

/// Handles the extract mode, which has no implementation
fn handle_extract(layout: &ProjectLayout) {
    StatusMessage::info(format!(
        "url_extractor is not implemented (requested for {})",
        layout.key()
    ))
    .emit();
}

/// Handles the history mode: prints ledger rows for the pair
fn handle_history(layout: &ProjectLayout) -> Result<(), Box<dyn std::error::Error>> {
    let ledger_path = layout.ledger_path();
    if !ledger_path.exists() {
        println!("No ledger at {}", ledger_path.display());
        return Ok(());
    }

    let ledger = SqliteLedger::open(&ledger_path)?;
    let key = layout.key();
    let history = load_history(&ledger, &key.site, &key.project)?;
    print_history(&history);

    Ok(())
}
