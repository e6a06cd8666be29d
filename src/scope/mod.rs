//! Domain scope and link filtering
//!
//! The crawl is restricted to the network location of the seed URL. Candidate
//! hrefs discovered on a page are resolved against that page's URL, filtered
//! to `http`/`https`, and kept only if their location matches the scope. Both
//! operations are pure: the same inputs always produce the same decision.

use crate::ScopeError;
use std::fmt;
use url::Url;

/// The network location (host and effective port) the crawl is confined to
///
/// Computed once from the seed URL at startup. Comparison uses the lowercased
/// host and the known-default port, so `https://example.test/` and
/// `https://example.test:443/x` belong to the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    host: String,
    port: u16,
}

impl DomainScope {
    /// Derives the scope from a seed URL
    pub fn from_seed(seed: &Url) -> Result<Self, ScopeError> {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(ScopeError::UnsupportedScheme(seed.to_string()));
        }

        let host = seed
            .host_str()
            .ok_or_else(|| ScopeError::MissingHost(seed.to_string()))?
            .to_lowercase();

        // http/https always have a known default port.
        let port = seed
            .port_or_known_default()
            .ok_or_else(|| ScopeError::MissingHost(seed.to_string()))?;

        Ok(Self { host, port })
    }

    /// Returns true if the URL's network location equals this scope
    pub fn contains(&self, url: &Url) -> bool {
        let same_host = url
            .host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host))
            .unwrap_or(false);

        same_host && url.port_or_known_default() == Some(self.port)
    }
}

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Resolves a raw href into an absolute crawl candidate
///
/// Returns `None` for hrefs that can never become tasks: fragments,
/// `mailto:`/`tel:`/`javascript:` pseudo-links, non-http(s) schemes, and
/// anything the base URL cannot resolve. The fragment of a resolved URL is
/// stripped so `/page#a` and `/page#b` are the same task.
pub fn resolve_candidate(base: &Url, href: &str) -> Option<Url> {
    let trimmed = href.trim();

    // A bare fragment points back into the current page.
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let mut resolved = base.join(trimmed).ok()?;

    match resolved.scheme() {
        "http" | "https" => {
            resolved.set_fragment(None);
            Some(resolved)
        }
        _ => None,
    }
}
