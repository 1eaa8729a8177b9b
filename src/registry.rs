use reqwest::Url;
use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
}

/// Ordered, non-empty list of feeds. Immutable once built.
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<FeedDescriptor>,
}

impl FeedRegistry {
    pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, ConfigError> {
        if feeds.is_empty() {
            return Err(ConfigError::NoFeeds);
        }

        for (index, feed) in feeds.iter().enumerate() {
            let url = feed.url.trim();
            if url.is_empty() {
                return Err(ConfigError::MissingUrl {
                    index,
                    name: feed.name.clone(),
                });
            }

            let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
                index,
                url: feed.url.clone(),
                reason: e.to_string(),
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ConfigError::InvalidUrl {
                    index,
                    url: feed.url.clone(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                });
            }
        }

        Ok(Self { feeds })
    }

    pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
        self.feeds.get(index)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedDescriptor> {
        self.feeds.iter()
    }
}
