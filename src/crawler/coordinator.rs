//! Crawl coordinator - seeds the queue, spawns workers, reports
//!
//! The coordinator is the only place that touches the whole pool: it seeds
//! the shared queue with the initial URL, computes the domain scope,
//! initializes the shared budget, spawns the configured number of worker
//! loops as independent tasks, waits for all of them to terminate, and
//! assembles the final crawl report.
//!
//! Workers terminate on their own (budget exhausted or queue drained);
//! nothing here tells them to stop.

use crate::budget::CrawlBudget;
use crate::config::Config;
use crate::crawler::worker::{Worker, WorkerSummary};
use crate::queue::TaskQueue;
use crate::scope::DomainScope;
use crate::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

/// Aggregate statistics of a finished crawl
///
/// Built once after every worker has terminated; read-only thereafter.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Number of worker loops that ran
    pub workers: u32,

    /// Final value of the shared budget counter: pages crawled
    pub pages_crawled: u64,

    /// The configured ceiling
    pub max_pages: u64,

    /// Wall time from first spawn to last join
    pub elapsed: Duration,

    /// Per-worker tallies
    pub summaries: Vec<WorkerSummary>,
}

/// Runs a complete distributed crawl and returns its report
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - All workers terminated
/// * `Err(CrawlError)` - Startup failed (queue/budget unreachable, bad seed)
///   or a worker aborted on a database error
pub async fn run_crawl(config: Config) -> Result<CrawlReport> {
    let seed = Url::parse(&config.crawl.seed_url)?;
    let scope = DomainScope::from_seed(&seed)?;

    tracing::info!(
        seed = %seed,
        scope = %scope,
        workers = config.crawl.workers,
        max_pages = config.crawl.max_pages,
        "starting crawl"
    );

    // Seed the frontier before any worker starts pulling.
    let queue = TaskQueue::open(&config.queue, "dispatcher")?;
    let already_pending = queue.pending_count()?;
    if already_pending > 0 {
        tracing::info!(
            pending = already_pending,
            "durable queue holds tasks from a previous run, resuming"
        );
    }
    queue.enqueue(seed.as_str())?;

    let budget = CrawlBudget::open(Path::new(&config.queue.db_path), config.crawl.max_pages)?;

    let started = Instant::now();

    let mut handles = Vec::new();
    for worker_id in 0..config.crawl.workers {
        let config = config.clone();
        let scope = scope.clone();
        handles.push(tokio::spawn(async move {
            let worker = Worker::new(worker_id, &config, scope)?;
            worker.run().await
        }));
    }

    let mut summaries = Vec::new();
    for handle in handles {
        let summary = handle.await??;
        tracing::debug!(
            worker = summary.worker_id,
            pages = summary.pages_crawled,
            failures = summary.fetch_failures,
            "worker finished"
        );
        summaries.push(summary);
    }

    let pages_crawled = budget.claimed()?;
    let report = CrawlReport {
        workers: config.crawl.workers,
        pages_crawled,
        max_pages: config.crawl.max_pages,
        elapsed: started.elapsed(),
        summaries,
    };

    tracing::info!(
        pages = report.pages_crawled,
        elapsed_secs = report.elapsed.as_secs_f64(),
        "crawl finished"
    );

    Ok(report)
}
