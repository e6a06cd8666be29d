//! Packcrawl main entry point
//!
//! Command-line interface for the distributed breadth-first crawler.

use anyhow::Context;
use clap::Parser;
use packcrawl::config::{resolve_config, CliOverrides, Config};
use packcrawl::crawler::run_crawl;
use packcrawl::output::print_report;
use packcrawl::scope::DomainScope;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Packcrawl: a distributed breadth-first web crawler
///
/// Packcrawl crawls the seed URL's site with a pool of workers that
/// coordinate through a durable on-disk task queue and a shared page budget.
/// Discovered same-site links feed back into the queue until the budget is
/// exhausted or the frontier drains.
#[derive(Parser, Debug)]
#[command(name = "packcrawl")]
#[command(version = "1.0.0")]
#[command(about = "A distributed breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (its host[:port] bounds the crawl)
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Number of worker loops to spawn
    #[arg(short, long)]
    workers: Option<u32>,

    /// Hard ceiling on pages fetched across all workers
    #[arg(short, long)]
    max_pages: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Discard the persisted queue and budget from a previous run
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = CliOverrides {
        seed_url: cli.seed.clone(),
        workers: cli.workers,
        max_pages: cli.max_pages,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)
        .context("failed to load configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    if cli.fresh {
        remove_persisted_state(&config.queue.db_path);
    }

    let report = run_crawl(config).await.context("crawl failed")?;
    print_report(&report);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("packcrawl=info,warn"),
            1 => EnvFilter::new("packcrawl=debug,info"),
            2 => EnvFilter::new("packcrawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let seed = Url::parse(&config.crawl.seed_url).context("invalid seed URL")?;
    let scope = DomainScope::from_seed(&seed).context("cannot derive crawl scope")?;

    println!("=== Packcrawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.crawl.seed_url);
    println!("  Scope: {}", scope);
    println!("  Workers: {}", config.crawl.workers);
    println!("  Max pages: {}", config.crawl.max_pages);

    println!("\nFetch:");
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Retries: {}", config.fetch.retries);

    println!("\nQueue:");
    println!("  Database: {}", config.queue.db_path);
    println!("  Lease: {}ms", config.queue.lease_ms);
    println!("  Poll: {}ms", config.queue.poll_ms);

    println!("\nOutput:");
    println!("  Pages directory: {}", config.output.pages_dir);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Removes the queue/budget database (and its WAL sidecars) for --fresh
fn remove_persisted_state(db_path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let path = format!("{db_path}{suffix}");
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::info!(%path, "removed persisted state"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(%path, error = %e, "could not remove persisted state"),
        }
    }
}
