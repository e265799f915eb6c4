//! Forum-Harvest main entry point
//!
//! This is the command-line interface for the Forum-Harvest thread harvester.

use anyhow::Context;
use clap::Parser;
use forum_harvest::config::{load_config_with_hash, Config};
use forum_harvest::crawler::run_harvest;
use forum_harvest::output::print_summary;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Forum-Harvest: a keyword-driven forum thread harvester
///
/// Forum-Harvest walks a range of forum listing pages, follows the threads
/// whose titles match the configured keywords, extracts catalog codes from
/// each thread, and writes them to a report sorted newest first.
#[derive(Parser, Debug)]
#[command(name = "forum-harvest")]
#[command(version)]
#[command(about = "A keyword-driven forum thread harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| {
                format!("failed to load configuration from {}", cli.config.display())
            });
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_harvest(config, hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forum_harvest=info,warn"),
            1 => EnvFilter::new("forum_harvest=debug,info"),
            2 => EnvFilter::new("forum_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration and listing URIs
fn handle_dry_run(config: &Config) {
    println!("=== Forum-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Listing base: {}", config.site.list_base_uri);
    println!("  Thread base: {}", config.site.detail_base_uri);

    println!("\nCrawler Configuration:");
    println!("  Concurrency cap: {}", config.crawler.concurrency_cap);
    println!(
        "  Bucket delay unit: {}s",
        config.crawler.bucket_delay_unit_seconds
    );
    println!("  Aggregation: {:?}", config.crawler.aggregation);
    println!("  Request timeout: {}s", config.crawler.request_timeout_seconds);
    if let Some(proxy) = &config.crawler.proxy {
        println!("  Proxy: {}", proxy);
    }

    println!("\nKeywords:");
    println!("  Link: {}", config.keywords.link.join(", "));
    println!("  Detail: {}", config.keywords.detail.join(", "));

    println!("\nOutput:");
    println!("  File: {}", config.output.file);
    println!("  Format: {:?}", config.output.format);

    let uris = config.listing_uris();
    println!("\nListing Pages ({}):", uris.len());
    for uri in &uris {
        println!("  - {}", uri);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, hash: String, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Listing pages {}..={}, link keywords: {}, detail keywords: {}",
        config.pages.start,
        config.pages.end,
        config.keywords.link.len(),
        config.keywords.detail.len()
    );

    // Ctrl-C stops the run instead of killing it mid-write
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping harvest");
            on_signal.cancel();
        }
    });

    match run_harvest(config, cancel).await {
        Ok(mut summary) => {
            summary.config_hash = Some(hash);
            if !quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e).context("harvest failed")
        }
    }
}
