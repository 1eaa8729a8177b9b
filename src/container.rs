use chrono::{DateTime, Utc};

/// One rendered feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Element id, unique to the load that produced this entry
    pub id: String,
    pub title: String,
    pub link: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn published_display(&self) -> String {
        self.published
            .map(|p| p.format("%b %e, %Y").to_string())
            .unwrap_or_default()
    }
}

/// The region holding rendered entries. Only the loader mutates it.
#[derive(Debug, Default)]
pub struct DisplayContainer {
    feed_name: Option<String>,
    entries: Vec<Entry>,
}

impl DisplayContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.feed_name = None;
        self.entries.clear();
    }

    pub fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Clears the container and appends `entries` in order.
    pub fn replace(&mut self, feed_name: &str, entries: Vec<Entry>) {
        self.clear();
        self.feed_name = Some(feed_name.to_string());
        self.entries.reserve(entries.len());
        for entry in entries {
            self.append(entry);
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn feed_name(&self) -> Option<&str> {
        self.feed_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
