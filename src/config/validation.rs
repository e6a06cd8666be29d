use crate::config::types::{Config, CrawlConfig, FetchConfig, OutputConfig, QueueConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetch_config(&config.fetch)?;
    validate_queue_config(&config.queue)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seed_url.is_empty() {
        return Err(ConfigError::Validation(
            "seed-url is required (pass it as the first CLI argument or set [crawl] seed-url)"
                .to_string(),
        ));
    }

    let url = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::Validation(format!("seed-url '{}' is not a URL: {}", config.seed_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "seed-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "seed-url '{}' has no host",
            config.seed_url
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be >= 1, got {}",
            config.timeout_ms
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates queue configuration
fn validate_queue_config(config: &QueueConfig) -> Result<(), ConfigError> {
    if config.db_path.is_empty() {
        return Err(ConfigError::Validation(
            "db-path cannot be empty".to_string(),
        ));
    }

    if config.lease_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "lease-ms must be >= 1, got {}",
            config.lease_ms
        )));
    }

    if config.poll_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "poll-ms must be >= 1, got {}",
            config.poll_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.pages_dir.is_empty() {
        return Err(ConfigError::Validation(
            "pages-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.crawl.seed_url = "https://example.com/".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_seed_rejected() {
        let mut config = valid_config();
        config.crawl.seed_url = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = valid_config();
        config.crawl.seed_url = "ftp://example.com/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_malformed_seed_rejected() {
        let mut config = valid_config();
        config.crawl.seed_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = valid_config();
        config.crawl.workers = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_too_many_workers_rejected() {
        let mut config = valid_config();
        config.crawl.workers = 65;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = valid_config();
        config.crawl.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.fetch.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_db_path_rejected() {
        let mut config = valid_config();
        config.queue.db_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_http_seed_accepted() {
        let mut config = valid_config();
        config.crawl.seed_url = "http://127.0.0.1:8080/".to_string();
        assert!(validate(&config).is_ok());
    }
}
