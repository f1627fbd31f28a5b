use crate::domain::NewsItem;
use crate::provider::{InputShape, NewsFeed, Provider, ProviderError, ProviderFuture, ProviderRequest};
use crate::ProviderId;

/// Placeholder registered for every provider id that has no backing client.
///
/// Always fails with [`ProviderErrorKind::NotConfigured`](crate::ProviderErrorKind::NotConfigured),
/// so a chain made only of these ends at its terminal sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnconfiguredProvider {
    id: ProviderId,
}

impl UnconfiguredProvider {
    pub const fn new(id: ProviderId) -> Self {
        Self { id }
    }
}

impl Provider for UnconfiguredProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn inputs(&self) -> InputShape {
        InputShape::ticker_only()
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        let _ = request;
        Box::pin(async move { Err(ProviderError::not_configured(self.id)) })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnconfiguredNewsFeed {
    id: ProviderId,
}

impl UnconfiguredNewsFeed {
    pub const fn new(id: ProviderId) -> Self {
        Self { id }
    }
}

impl NewsFeed for UnconfiguredNewsFeed {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn fetch_news<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, Vec<NewsItem>> {
        let _ = request;
        Box::pin(async move { Err(ProviderError::not_configured(self.id)) })
    }
}
