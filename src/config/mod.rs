//! Configuration loading and validation for packcrawl
//!
//! A crawl is configured from CLI flags, an optional TOML file, or both;
//! CLI flags always win.

mod parser;
mod types;
mod validation;

pub use parser::{load_config, resolve_config, CliOverrides};
pub use types::{Config, CrawlConfig, FetchConfig, OutputConfig, QueueConfig};
pub use validation::validate;
