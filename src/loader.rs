use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use reqwest::Client;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use html_escape::decode_html_entities_to_string;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::container::{DisplayContainer, Entry};
use crate::registry::{FeedDescriptor, FeedRegistry};

const SNIPPET_MAX_CHARS: usize = 280;

pub type SharedContainer = Arc<RwLock<DisplayContainer>>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no feed at index {0}")]
    UnknownFeed(usize),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] parser::ParseFeedError),
    #[error("load of feed {index} superseded by a newer request")]
    Superseded { index: usize, generation: u64 },
}

/// Outcome of a load that reached the container.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub index: usize,
    pub feed_name: String,
    pub entries: usize,
    pub generation: u64,
}

/// Fetches feeds from the registry and swaps their entries into the container.
///
/// Overlapping loads are resolved by generation: each call takes a ticket and
/// only the most recently started load may commit. Older loads finish with
/// [`LoadError::Superseded`] and leave the container alone.
#[derive(Clone)]
pub struct FeedLoader {
    client: Client,
    registry: Arc<FeedRegistry>,
    container: SharedContainer,
    generation: Arc<AtomicU64>,
}

impl FeedLoader {
    pub fn new(
        registry: Arc<FeedRegistry>,
        container: SharedContainer,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            registry,
            container,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn from_config(
        config: &Config,
        registry: Arc<FeedRegistry>,
        container: SharedContainer,
    ) -> Result<Self, LoadError> {
        Self::new(
            registry,
            container,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
        )
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    pub fn container(&self) -> &SharedContainer {
        &self.container
    }

    /// Loads the feed at `index` into the container.
    ///
    /// Resolves once the container holds the new entries, or with an error
    /// while the container still holds its prior content.
    pub async fn load_feed(&self, index: usize) -> Result<LoadReport, LoadError> {
        let feed = self
            .registry
            .get(index)
            .ok_or(LoadError::UnknownFeed(index))?;
        // Only a resolvable feed may supersede an in-flight load
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let entries = match self.fetch_entries(feed, generation).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to load feed '{}': {}", feed.name, e);
                return Err(e);
            }
        };

        let mut container = self.container.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Discarding {} entries for '{}', a newer load was requested",
                entries.len(),
                feed.name
            );
            return Err(LoadError::Superseded { index, generation });
        }

        let count = entries.len();
        container.replace(&feed.name, entries);
        info!("Loaded {} entries from '{}'", count, feed.name);

        Ok(LoadReport {
            index,
            feed_name: feed.name.clone(),
            entries: count,
            generation,
        })
    }

    /// Spawns [`load_feed`](Self::load_feed) and hands its result to
    /// `on_complete` exactly once.
    pub fn load_feed_then<F>(&self, index: usize, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<LoadReport, LoadError>) + Send + 'static,
    {
        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.load_feed(index).await;
            on_complete(result);
        })
    }

    async fn fetch_entries(
        &self,
        feed: &FeedDescriptor,
        generation: u64,
    ) -> Result<Vec<Entry>, LoadError> {
        info!("Fetching feed: {} ({})", feed.name, feed.url);

        let response = self.client.get(feed.url.trim()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        let parsed = parser::parse(&bytes[..])?;
        if parsed.entries.is_empty() {
            debug!("Feed '{}' has no entries", feed.name);
        }

        Ok(parsed
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| render_entry(entry, generation, position))
            .collect())
    }
}

pub fn render_entry(entry: &feed_rs::model::Entry, generation: u64, position: usize) -> Entry {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let raw_content = entry
        .summary
        .as_ref()
        .map(|s| s.content.as_str())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.as_deref()))
        .unwrap_or("");

    let published: Option<DateTime<Utc>> = entry.published.or(entry.updated);

    Entry {
        id: format!("entry-{}-{}", generation, position),
        title,
        link,
        content: snippet(raw_content, SNIPPET_MAX_CHARS),
        published,
    }
}

/// Plain-text excerpt of `html`: tags dropped, entities decoded, whitespace
/// collapsed, cut at `max_chars` characters.
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`, so
/// bare comparisons in text survive.
pub fn snippet(html: &str, max_chars: usize) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    let mut in_tag = false;
    while let Some(c) = chars.next() {
        if in_tag {
            if c == '>' {
                in_tag = false;
                stripped.push(' ');
            }
            continue;
        }
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));
        if opens_tag {
            in_tag = true;
        } else {
            stripped.push(c);
        }
    }

    let mut text = String::with_capacity(stripped.len());
    decode_html_entities_to_string(&stripped, &mut text);

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}
