use serde::Deserialize;
use std::path::Path;

use crate::registry::{FeedDescriptor, FeedRegistry};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no feeds configured")]
    NoFeeds,
    #[error("feed #{index} ('{name}') has no url")]
    MissingUrl { index: usize, name: String },
    #[error("feed #{index} has an invalid url '{url}': {reason}")]
    InvalidUrl {
        index: usize,
        url: String,
        reason: String,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Per-request timeout for feed fetches, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub feeds: Vec<FeedDescriptor>,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_user_agent() -> String {
    "FeedReader/1.0".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Validates the configured feeds and builds the registry from them.
    pub fn registry(&self) -> Result<FeedRegistry, ConfigError> {
        FeedRegistry::new(self.feeds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_listen_addr(), "0.0.0.0:3000");
        assert_eq!(default_user_agent(), "FeedReader/1.0");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
            request_timeout_secs = 10
            listen_addr = "127.0.0.1:8080"

            [[feeds]]
            name = "Udacity Blog"
            url = "http://blog.udacity.com/feed"

            [[feeds]]
            name = "CSS Tricks"
            url = "http://feeds.feedburner.com/CssTricks"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].name, "Udacity Blog");
        assert_eq!(config.feeds[0].url, "http://blog.udacity.com/feed");
        assert_eq!(config.feeds[1].name, "CSS Tricks");
    }

    #[test]
    fn test_load_config_with_defaults() {
        let content = r#"
            [[feeds]]
            name = "Test Feed"
            url = "https://example.com/feed.xml"
        "#;

        let config = Config::from_str(content).unwrap();

        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.user_agent, "FeedReader/1.0");
        assert_eq!(config.feeds.len(), 1);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let content = "this is not valid toml {{{";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_config_missing_url_field() {
        let content = r#"
            [[feeds]]
            name = "Test Feed"
            # Missing url field
        "#;

        let result = Config::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_feeds_list_parses_but_fails_registry() {
        let config = Config::from_str("feeds = []").unwrap();
        assert!(config.feeds.is_empty());
        assert!(matches!(config.registry(), Err(ConfigError::NoFeeds)));
    }

    #[test]
    fn test_blank_url_fails_registry() {
        let content = r#"
            [[feeds]]
            name = "Good"
            url = "https://example.com/feed.xml"

            [[feeds]]
            name = "Blank"
            url = "  "
        "#;

        let config = Config::from_str(content).unwrap();
        match config.registry() {
            Err(ConfigError::MissingUrl { index, name }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "Blank");
            }
            other => panic!("expected MissingUrl, got {:?}", other),
        }
    }
}
