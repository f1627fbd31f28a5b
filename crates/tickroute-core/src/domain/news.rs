use serde::{Deserialize, Serialize};

/// One raw article returned by a news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub url: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: String::new(),
            published_at: String::new(),
            url: String::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = published_at.into();
        self
    }
}

/// A news item annotated with its relevance score (0-100).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNews {
    pub item: NewsItem,
    pub score: f64,
}
