//! Packcrawl: a distributed breadth-first web crawler
//!
//! This crate implements a crawler whose workers coordinate through a shared,
//! durable task queue and a shared crawl budget. Workers discover new work
//! dynamically (links found on a page become new tasks) while a global page
//! ceiling is enforced across the whole pool.

pub mod budget;
pub mod config;
pub mod crawler;
pub mod output;
pub mod queue;
pub mod scope;

use thiserror::Error;

/// Main error type for packcrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task panicked or was cancelled: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors computing the crawl's domain scope
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Seed URL has no host: {0}")]
    MissingHost(String),

    #[error("Seed URL scheme is not http/https: {0}")]
    UnsupportedScheme(String),
}

/// Result type alias for packcrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use budget::CrawlBudget;
pub use config::Config;
pub use crawler::{run_crawl, CrawlReport};
pub use queue::{Delivery, TaskQueue};
pub use scope::{resolve_candidate, DomainScope};
