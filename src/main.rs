//! Netco-Harvest main entry point
//!
//! This is the command-line interface for the Netco-Harvest document harvester.

use anyhow::Context;
use clap::Parser;
use netco_harvest::catalog::Category;
use netco_harvest::config::{load_config_with_hash, Config};
use netco_harvest::crawler::Coordinator;
use netco_harvest::output::{load_snapshot, print_statistics, save_snapshot, HarvestStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Netco-Harvest: a document listing harvester
///
/// Walks the category document tables of the site, removes duplicate
/// listings, downloads the referenced files and writes a JSON snapshot
/// of everything collected.
#[derive(Parser, Debug)]
#[command(name = "netco-harvest")]
#[command(version)]
#[command(about = "Harvests document listings and files", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip crawling; load the existing snapshot and show its statistics
    #[arg(long, conflicts_with = "dry_run")]
    skip_crawl: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "skip_crawl")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.skip_crawl {
        handle_skip_crawl(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("netco_harvest=info,warn"),
            1 => EnvFilter::new("netco_harvest=debug,info"),
            2 => EnvFilter::new("netco_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Netco-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Bootstrap pages: {}", config.site.html_dir);

    println!("\nDownload:");
    println!("  Documents root: {}", config.download.documents_dir);
    println!(
        "  Max concurrent downloads: {}",
        config.download.max_concurrent_downloads
    );
    println!("  Request timeout: {}s", config.download.request_timeout_secs);

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);

    println!("\nCategories ({}):", Category::ALL.len());
    let html_dir = Path::new(&config.site.html_dir);
    for category in Category::ALL {
        let bootstrap = html_dir.join(format!("{}.html", category.key()));
        let marker = if bootstrap.is_file() { "✓" } else { "✗" };
        println!(
            "  {} {} -> {} ({})",
            marker,
            category.key(),
            category.display_folder(),
            bootstrap.display()
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --skip-crawl mode: reports on the existing snapshot
fn handle_skip_crawl(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.snapshot_path);
    tracing::info!("Skipping crawl, loading snapshot {}", path.display());

    let documents = load_snapshot(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    print_statistics(&HarvestStatistics::from_documents(&documents));

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let snapshot_path = PathBuf::from(&config.output.snapshot_path);
    let documents_dir = config.download.documents_dir.clone();

    let mut coordinator = Coordinator::new(config).context("failed to prepare harvest")?;
    let stats = match coordinator.run().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    save_snapshot(coordinator.documents(), &snapshot_path)
        .with_context(|| format!("failed to save snapshot {}", snapshot_path.display()))?;

    print_statistics(&stats);
    tracing::info!("Done! Documents are stored in {}", documents_dir);

    Ok(())
}
