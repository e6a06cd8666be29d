use serde::Deserialize;

/// Main configuration structure for packcrawl
///
/// Every section has working defaults so a crawl can be started entirely from
/// CLI flags; a TOML file overrides the defaults and CLI flags override both.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    /// URL the crawl starts from; its network location becomes the crawl scope
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Number of worker loops to spawn
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Hard ceiling on pages fetched across the whole pool
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u64,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Client identifier sent in the User-Agent header
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Extra attempts after a failed fetch, with a fixed 1s delay between
    /// them. Zero keeps the drop-on-first-failure behavior of the
    /// distributed core.
    #[serde(default)]
    pub retries: u32,
}

/// Task queue configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Path to the SQLite database holding the queue and the budget counter
    #[serde(rename = "db-path", default = "default_db_path")]
    pub db_path: String,

    /// How long a claimed task stays reserved for its consumer before it
    /// becomes eligible for redelivery (milliseconds)
    #[serde(rename = "lease-ms", default = "default_lease_ms")]
    pub lease_ms: u64,

    /// Poll interval of a blocked consumer waiting for work (milliseconds)
    #[serde(rename = "poll-ms", default = "default_poll_ms")]
    pub poll_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory where fetched pages are written, one file per page
    #[serde(rename = "pages-dir", default = "default_pages_dir")]
    pub pages_dir: String,
}

fn default_workers() -> u32 {
    4
}

fn default_max_pages() -> u64 {
    50
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_user_agent() -> String {
    "PackcrawlBot/1.0".to_string()
}

fn default_db_path() -> String {
    "./crawl.db".to_string()
}

fn default_lease_ms() -> u64 {
    60_000
}

fn default_poll_ms() -> u64 {
    250
}

fn default_pages_dir() -> String {
    "./pages".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            workers: default_workers(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            retries: 0,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            lease_ms: default_lease_ms(),
            poll_ms: default_poll_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
        }
    }
}
