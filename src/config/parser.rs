use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// CLI values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed_url: Option<String>,
    pub workers: Option<u32>,
    pub max_pages: Option<u64>,
}

/// Loads and parses a configuration file from the given path
///
/// The returned config is not yet validated; callers apply CLI overrides
/// first and then validate the merged result.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Builds the effective configuration from an optional TOML file and CLI
/// overrides, then validates it
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
/// * `overrides` - CLI values that win over file values
///
/// # Returns
///
/// * `Ok(Config)` - Merged and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate
pub fn resolve_config(path: Option<&Path>, overrides: CliOverrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => Config::default(),
    };

    if let Some(seed_url) = overrides.seed_url {
        config.crawl.seed_url = seed_url;
    }
    if let Some(workers) = overrides.workers {
        config.crawl.workers = workers;
    }
    if let Some(max_pages) = overrides.max_pages {
        config.crawl.max_pages = max_pages;
    }

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
seed-url = "https://example.com/"
workers = 8
max-pages = 200

[fetch]
timeout-ms = 3000
user-agent = "TestBot/0.1"

[queue]
db-path = "./test.db"

[output]
pages-dir = "./test-pages"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.seed_url, "https://example.com/");
        assert_eq!(config.crawl.workers, 8);
        assert_eq!(config.crawl.max_pages, 200);
        assert_eq!(config.fetch.timeout_ms, 3000);
        assert_eq!(config.fetch.user_agent, "TestBot/0.1");
        assert_eq!(config.queue.db_path, "./test.db");
        assert_eq!(config.output.pages_dir, "./test-pages");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config_content = r#"
[crawl]
seed-url = "https://example.com/"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.workers, 4);
        assert_eq!(config.fetch.timeout_ms, 5000);
        assert_eq!(config.fetch.retries, 0);
        assert_eq!(config.queue.lease_ms, 60_000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let config_content = r#"
[crawl]
seed-url = "https://file.example/"
workers = 2
max-pages = 10
"#;

        let file = create_temp_config(config_content);
        let overrides = CliOverrides {
            seed_url: Some("https://cli.example/".to_string()),
            workers: Some(6),
            max_pages: None,
        };
        let config = resolve_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.crawl.seed_url, "https://cli.example/");
        assert_eq!(config.crawl.workers, 6);
        assert_eq!(config.crawl.max_pages, 10);
    }

    #[test]
    fn test_resolve_without_file() {
        let overrides = CliOverrides {
            seed_url: Some("https://example.com/".to_string()),
            workers: None,
            max_pages: None,
        };
        let config = resolve_config(None, overrides).unwrap();

        assert_eq!(config.crawl.seed_url, "https://example.com/");
        assert_eq!(config.crawl.workers, 4);
    }

    #[test]
    fn test_resolve_requires_seed() {
        let result = resolve_config(None, CliOverrides::default());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
