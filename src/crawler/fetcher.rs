//! HTTP fetcher implementation
//!
//! The fetch facade used by workers: a timed GET that returns the page body
//! or a classified failure. Failures are terminal for the task in the
//! distributed core; an optional retry count (fixed 1s delay) exists for
//! small single-domain crawls.

use crate::config::FetchConfig;
use reqwest::Client;
use std::time::Duration;

/// Delay between retry attempts when retries are configured
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpStatus {
        /// The HTTP status code
        status: u16,
    },

    /// Network-level failure (connection refused, timeout, etc.)
    Network {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Returns true for `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds the HTTP client a worker uses for all of its fetches
///
/// The client identifies itself with the configured user-agent string and
/// bounds every request with the configured timeout.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
}

/// Fetches a URL, retrying transient failures `retries` times
///
/// With `retries == 0` (the default for the distributed crawl) any failure is
/// returned immediately and the caller drops the task.
pub async fn fetch_url(client: &Client, url: &str, retries: u32) -> FetchOutcome {
    let mut attempt = 0;
    loop {
        let outcome = fetch_once(client, url).await;
        if outcome.is_success() || attempt >= retries {
            return outcome;
        }

        attempt += 1;
        tracing::debug!(%url, attempt, retries, "fetch failed, retrying");
        tokio::time::sleep(RETRY_DELAY).await;
    }
}

async fn fetch_once(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchOutcome::HttpStatus {
                    status: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success { body },
                Err(e) => FetchOutcome::Network {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchOutcome::Network {
                    error: "request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchOutcome::Network {
                    error: "connection failed".to_string(),
                }
            } else {
                FetchOutcome::Network {
                    error: e.to_string(),
                }
            }
        }
    }
}
