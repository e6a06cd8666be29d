//! Crawler module: fetching, link discovery, the worker loop, and the
//! coordinator that drives a pool of workers
//!
//! This module contains the execution side of a crawl:
//! - HTTP fetching with timeout (and optional retries)
//! - HTML link extraction
//! - The per-task worker state machine
//! - Pool orchestration and the final report

mod coordinator;
mod fetcher;
mod parser;
mod worker;

pub use coordinator::{run_crawl, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use parser::extract_hrefs;
pub use worker::{Worker, WorkerSummary};
