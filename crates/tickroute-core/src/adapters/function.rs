use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use crate::domain::NewsItem;
use crate::provider::{InputShape, NewsFeed, Provider, ProviderError, ProviderFuture, ProviderRequest};
use crate::ProviderId;

type ReportHandler = dyn Fn(ProviderRequest) -> ProviderFuture<'static, String> + Send + Sync;
type RowsHandler = dyn Fn(ProviderRequest) -> ProviderFuture<'static, Vec<NewsItem>> + Send + Sync;

/// Closure-backed provider for embedding callers and tests.
#[derive(Clone)]
pub struct FnProvider {
    id: ProviderId,
    inputs: InputShape,
    handler: Arc<ReportHandler>,
}

impl FnProvider {
    pub fn new<F, Fut>(id: ProviderId, inputs: InputShape, handler: F) -> Self
    where
        F: Fn(ProviderRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ProviderError>> + Send + 'static,
    {
        Self {
            id,
            inputs,
            handler: Arc::new(move |request| Box::pin(handler(request))),
        }
    }

    /// Provider that always returns `content`.
    pub fn returning(id: ProviderId, content: impl Into<String>) -> Self {
        let content = content.into();
        Self::new(id, InputShape::ticker_only(), move |_| {
            let content = content.clone();
            async move { Ok(content) }
        })
    }

    /// Provider that always fails with `error`.
    pub fn failing(id: ProviderId, error: ProviderError) -> Self {
        Self::new(id, InputShape::ticker_only(), move |_| {
            let error = error.clone();
            async move { Err(error) }
        })
    }
}

impl Debug for FnProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProvider")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

impl Provider for FnProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn inputs(&self) -> InputShape {
        self.inputs
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        (self.handler)(request)
    }
}

/// Closure-backed news feed.
#[derive(Clone)]
pub struct FnNewsFeed {
    id: ProviderId,
    handler: Arc<RowsHandler>,
}

impl FnNewsFeed {
    pub fn new<F, Fut>(id: ProviderId, handler: F) -> Self
    where
        F: Fn(ProviderRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<NewsItem>, ProviderError>> + Send + 'static,
    {
        Self {
            id,
            handler: Arc::new(move |request| Box::pin(handler(request))),
        }
    }

    pub fn returning(id: ProviderId, rows: Vec<NewsItem>) -> Self {
        Self::new(id, move |_| {
            let rows = rows.clone();
            async move { Ok(rows) }
        })
    }
}

impl Debug for FnNewsFeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnNewsFeed")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl NewsFeed for FnNewsFeed {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn fetch_news<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, Vec<NewsItem>> {
        (self.handler)(request)
    }
}
