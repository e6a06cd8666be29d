//! Worker loop: the unit of execution of a distributed crawl
//!
//! A worker repeatedly takes one task from the shared queue and runs it
//! through a fixed state machine: dedup against its private visited set,
//! reserve a budget slot, fetch, persist, republish in-scope links, and
//! acknowledge. Every path through the machine ends in exactly one ack, so
//! the queue never holds a permanently stuck in-flight message.
//!
//! Workers share nothing in memory. The queue and the budget live in the
//! shared database; the visited set, HTTP client, and file handles are
//! private. Termination is local: a worker stops once it personally observes
//! budget exhaustion or a drained queue, without signaling its peers.

use crate::budget::CrawlBudget;
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::parser::extract_hrefs;
use crate::output::PageStore;
use crate::queue::{Delivery, TaskQueue};
use crate::scope::{resolve_candidate, DomainScope};
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Per-worker tallies, reported after the loop exits
#[derive(Debug, Clone, Default)]
pub struct WorkerSummary {
    pub worker_id: u32,
    pub pages_crawled: u64,
    pub duplicates_skipped: u64,
    pub fetch_failures: u64,
    pub links_enqueued: u64,
}

/// How a single delivered task ended
enum TaskOutcome {
    Crawled,
    Duplicate,
    FetchFailed,
    BudgetExhausted,
}

/// One worker loop instance
pub struct Worker {
    id: u32,
    queue: TaskQueue,
    budget: CrawlBudget,
    client: Client,
    scope: DomainScope,
    visited: HashSet<String>,
    store: PageStore,
    retries: u32,
    summary: WorkerSummary,
}

impl Worker {
    /// Creates a worker with its own connections to the shared queue and
    /// budget, its own HTTP client, and its own page store handle
    pub fn new(id: u32, config: &Config, scope: DomainScope) -> Result<Self> {
        let consumer = format!("worker-{id}");
        let queue = TaskQueue::open(&config.queue, &consumer)?;
        let budget = CrawlBudget::open(Path::new(&config.queue.db_path), config.crawl.max_pages)?;
        let client = build_http_client(&config.fetch)?;
        let store = PageStore::new(Path::new(&config.output.pages_dir))?;

        Ok(Self {
            id,
            queue,
            budget,
            client,
            scope,
            visited: HashSet::new(),
            store,
            retries: config.fetch.retries,
            summary: WorkerSummary {
                worker_id: id,
                ..WorkerSummary::default()
            },
        })
    }

    /// Runs the consume-process-ack loop until this worker observes budget
    /// exhaustion or the queue drains
    pub async fn run(mut self) -> Result<WorkerSummary> {
        loop {
            let delivery = match self.queue.dequeue_blocking().await? {
                Some(d) => d,
                None => {
                    tracing::info!(worker = self.id, "frontier drained, stopping");
                    break;
                }
            };

            let outcome = self.process(&delivery).await?;

            // Exactly one ack per delivery, whatever happened above.
            self.queue.ack(&delivery)?;

            if matches!(outcome, TaskOutcome::BudgetExhausted) {
                tracing::info!(worker = self.id, "page budget exhausted, stopping");
                break;
            }
        }

        Ok(self.summary)
    }

    /// Processes one delivered task through the full state machine
    async fn process(&mut self, delivery: &Delivery) -> Result<TaskOutcome> {
        let url = delivery.url.as_str();

        // Dedup before reserving, so a duplicate never consumes a slot.
        if self.visited.contains(url) {
            tracing::debug!(worker = self.id, %url, "already visited, skipping");
            self.summary.duplicates_skipped += 1;
            return Ok(TaskOutcome::Duplicate);
        }

        let ordinal = match self.budget.try_reserve()? {
            Some(n) => n,
            None => return Ok(TaskOutcome::BudgetExhausted),
        };

        tracing::info!(worker = self.id, %url, page = ordinal, "crawling");

        match fetch_url(&self.client, url, self.retries).await {
            FetchOutcome::Success { body } => {
                let path = self.store.save(ordinal, &body)?;
                tracing::debug!(worker = self.id, path = %path.display(), "saved page");

                self.visited.insert(url.to_string());

                let enqueued = self.expand_frontier(url, &body)?;
                self.summary.pages_crawled += 1;
                self.summary.links_enqueued += enqueued;
                Ok(TaskOutcome::Crawled)
            }
            FetchOutcome::HttpStatus { status } => {
                tracing::warn!(worker = self.id, %url, status, "fetch failed, dropping task");
                self.budget.release()?;
                self.summary.fetch_failures += 1;
                Ok(TaskOutcome::FetchFailed)
            }
            FetchOutcome::Network { error } => {
                tracing::warn!(worker = self.id, %url, error = %error, "fetch failed, dropping task");
                self.budget.release()?;
                self.summary.fetch_failures += 1;
                Ok(TaskOutcome::FetchFailed)
            }
        }
    }

    /// Republishes the page's in-scope links onto the shared queue
    ///
    /// Every href is resolved against the page URL; only http(s) URLs whose
    /// network location equals the crawl scope survive. Malformed and
    /// out-of-scope hrefs are dropped silently.
    fn expand_frontier(&mut self, page_url: &str, body: &str) -> Result<u64> {
        let Ok(base) = Url::parse(page_url) else {
            // Only resolved URLs are ever enqueued, but a task redelivered
            // from an older database could hold anything.
            tracing::debug!(worker = self.id, url = %page_url, "unparseable page URL, no links followed");
            return Ok(0);
        };

        let mut enqueued = 0u64;
        for href in extract_hrefs(body) {
            let Some(resolved) = resolve_candidate(&base, &href) else {
                continue;
            };

            if !self.scope.contains(&resolved) {
                tracing::trace!(worker = self.id, url = %resolved, "out of scope, dropped");
                continue;
            }

            self.queue.enqueue(resolved.as_str())?;
            enqueued += 1;
        }

        Ok(enqueued)
    }
}
