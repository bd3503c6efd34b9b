//! Ripple-Crawl main entry point
//!
//! This is the command-line interface that runs every crawler of a
//! configuration file until it finishes.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, FileConfig};
use ripple_crawl::{CrawlerId, CrawlerRegistry, CrawlerState, HttpFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a single-host web crawler
///
/// Each `[[crawler]]` entry of the configuration crawls one host, starting
/// from its seeds and following same-host links until none are left.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A single-host web crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Stop all crawlers after this many seconds
    #[arg(long, value_name = "SECS")]
    stop_after: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.stop_after.map(Duration::from_secs)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
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
fn handle_dry_run(config: &FileConfig) {
    println!("=== Ripple-Crawl Dry Run ===\n");

    println!("Defaults:");
    println!("  User agent: {}", config.defaults.user_agent);
    println!("  Crawl delay: {}ms", config.defaults.crawl_delay_ms);

    println!("\nCrawlers ({}):", config.crawlers.len());
    for entry in &config.crawlers {
        println!("  - {}", entry.label());
        for seed in &entry.seeds {
            println!("    * {}", seed);
        }
        if !entry.skip.is_empty() {
            println!("    skip: {}", entry.skip.join(", "));
        }
        if !entry.excluded_types.is_empty() {
            println!("    excluded types: {}", entry.excluded_types.join(", "));
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start {} crawlers with {} seed URLs",
        config.crawlers.len(),
        config.crawlers.iter().map(|c| c.seeds.len()).sum::<usize>()
    );
}

/// Registers, starts and awaits every configured crawler
async fn handle_crawl(config: &FileConfig, stop_after: Option<Duration>) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let registry = Arc::new(CrawlerRegistry::new(Handle::current(), Arc::new(fetcher)));

    let mut ids = Vec::new();
    for crawler_config in config.crawler_configs()? {
        let id = registry.register(crawler_config)?;
        watch_crawler(&registry, id);
        ids.push(id);
    }

    for &id in &ids {
        registry.start(id);
    }

    let all_done = {
        let registry = Arc::clone(&registry);
        let ids = ids.clone();
        async move {
            for id in ids {
                registry.wait_until_done(id).await;
            }
        }
    };
    let deadline = async {
        match stop_after {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = all_done => {}
        _ = deadline => {
            tracing::info!("Time limit reached, stopping all crawlers");
            registry.stop_all();
        }
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            tracing::info!("Interrupted, stopping all crawlers");
            registry.stop_all();
        }
    }

    let mut failed = 0;
    for info in registry.list() {
        println!(
            "{} {} [{}] pages: {} succeeded, {} failed, {} pending",
            info.id,
            info.host,
            info.state,
            info.frontier.succeeded,
            info.frontier.failed,
            info.frontier.pending
        );
        if info.state == CrawlerState::Failed {
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} crawlers failed", failed, ids.len());
    }
    Ok(())
}

/// Logs the events of one crawler
fn watch_crawler(registry: &CrawlerRegistry, id: CrawlerId) {
    registry.subscribe_state_changed(id, move |e| {
        tracing::info!(crawler = %e.crawler_id, "{} -> {}", e.old_state, e.new_state);
    });
    registry.subscribe_data_acquired(id, move |e| {
        tracing::info!(crawler = %e.crawler_id, "Crawled {} \"{}\"", e.location, e.title);
    });
    registry.subscribe_links_extracted(id, move |e| {
        tracing::debug!(crawler = %e.crawler_id, "{} links on {}", e.links.len(), e.source);
    });
}
