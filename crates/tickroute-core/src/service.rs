//! Request-facing entry points.
//!
//! Every method returns a report string. Data unavailability is expressed in
//! the content (sentinel messages, inline notes), never as an error.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chain::{ChainOutcome, FailurePolicy, FallbackChain, DEFAULT_MIN_NEWS_LEN};
use crate::context::{ContextBuilder, FilteredNewsOptions, NewsOptions, RequestContext};
use crate::filter::{FilterCache, FilterKey, RelevanceFilter};
use crate::provider::{InputShape, ProviderRequest};
use crate::registry::ProviderRegistry;
use crate::report::{format_filtered_news, format_report, labelled_section};
use crate::routing::{route, RoutePlan};
use crate::{CoreError, ProviderId, Settings};

/// Async entry points over one registry and one filter cache.
pub struct ReportService {
    registry: Arc<ProviderRegistry>,
    filter_cache: Arc<FilterCache>,
    contexts: ContextBuilder,
    min_news_len: usize,
    local_model_path: Option<PathBuf>,
}

impl ReportService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            filter_cache: Arc::new(FilterCache::default()),
            contexts: ContextBuilder::new(),
            min_news_len: DEFAULT_MIN_NEWS_LEN,
            local_model_path: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut filter_cache = FilterCache::new(settings.filter_cache_capacity);
        if let Some(ttl) = settings.filter_cache_ttl() {
            filter_cache = filter_cache.with_ttl(ttl);
        }

        Self::new(ProviderRegistry::from_settings(settings))
            .with_filter_cache(Arc::new(filter_cache))
            .with_min_news_len(settings.min_news_len)
            .with_local_model_path(settings.local_model_path.clone())
    }

    /// Pins the clock used for date ranges.
    pub fn with_context_builder(mut self, contexts: ContextBuilder) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn with_filter_cache(mut self, filter_cache: Arc<FilterCache>) -> Self {
        self.filter_cache = filter_cache;
        self
    }

    pub fn with_min_news_len(mut self, min_news_len: usize) -> Self {
        self.min_news_len = min_news_len;
        self
    }

    pub fn with_local_model_path(mut self, path: Option<PathBuf>) -> Self {
        self.local_model_path = path;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn filter_cache(&self) -> &FilterCache {
        &self.filter_cache
    }

    /// Runs the routed chain for an already-built context.
    pub async fn run_chain(&self, context: &RequestContext) -> ChainOutcome {
        self.run_plan(route(context.kind, context.category()), context).await
    }

    async fn run_plan(&self, plan: &RoutePlan, context: &RequestContext) -> ChainOutcome {
        FallbackChain::from_plan(plan, &self.registry)
            .with_policy(FailurePolicy::for_kind(context.kind, self.min_news_len))
            .execute(context)
            .await
    }

    pub async fn fundamentals(&self, ticker: &str) -> String {
        let context = self.contexts.fundamentals(ticker);
        info!(ticker = %context.ticker, market = %context.category(), "fetching fundamentals");

        let plan = route(context.kind, context.category());
        let outcome = self.run_plan(plan, &context).await;
        let section = labelled_section(plan.section_heading, outcome.content);

        format_report(&context.ticker, &context.market, context.as_of, &[section])
    }

    pub async fn news(&self, ticker: &str, options: NewsOptions) -> String {
        let context = self.contexts.news(ticker, options);
        info!(
            ticker = %context.ticker,
            market = %context.category(),
            hours_back = options.hours_back,
            look_back_days = options.look_back_days,
            "fetching news"
        );

        self.run_chain(&context).await.content
    }

    pub async fn filtered_news(&self, ticker: &str, options: FilteredNewsOptions) -> String {
        let context = self.contexts.filtered_news(ticker, &options);
        match self.filtered_news_report(&context, &options).await {
            Ok(Some(report)) => report,
            Ok(None) => {
                warn!(ticker = %context.ticker, "no news left after filtering");
                no_relevant_news(&context.ticker)
            }
            Err(error) => {
                error!(ticker = %context.ticker, error = %error, "filtered news pipeline failed");
                filtered_news_error(&context.ticker, &error)
            }
        }
    }

    async fn filtered_news_report(
        &self,
        context: &RequestContext,
        options: &FilteredNewsOptions,
    ) -> Result<Option<String>, CoreError> {
        options.validate()?;

        let feed = self.registry.news_feed();
        let request = ProviderRequest::project(
            context,
            InputShape::for_provider(ProviderId::StockNewsFeed),
        );
        let rows = feed.fetch_news(request).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        info!(ticker = %context.ticker, rows = rows.len(), "fetched raw news rows");

        let key = FilterKey::new(&context.ticker, options.use_semantic, options.use_local_model);
        let local_model_path = self.local_model_path.clone();
        let build_key = key.clone();
        let filter = self
            .filter_cache
            .get_or_create(key, move || {
                RelevanceFilter::build(build_key, local_model_path.as_deref())
            })
            .await?;

        let mut kept = filter.filter(rows, options.min_score);
        kept.truncate(options.max_items);
        if kept.is_empty() {
            return Ok(None);
        }

        info!(ticker = %context.ticker, kept = kept.len(), "filtered news rows");
        Ok(Some(format_filtered_news(&context.ticker, &kept)))
    }
}

pub fn no_relevant_news(ticker: &str) -> String {
    format!("No relevant news found for {ticker} with the specified criteria.")
}

fn filtered_news_error(ticker: &str, error: &CoreError) -> String {
    format!("An error occurred while fetching or filtering news for {ticker}: {error}")
}

/// Synchronous facade driving [`ReportService`] on an owned runtime.
pub struct BlockingReportService {
    inner: ReportService,
    runtime: tokio::runtime::Runtime,
}

impl BlockingReportService {
    pub fn new(inner: ReportService) -> Result<Self, CoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }

    pub fn service(&self) -> &ReportService {
        &self.inner
    }

    pub fn fundamentals(&self, ticker: &str) -> String {
        self.block_on("fundamentals", ticker, self.inner.fundamentals(ticker))
    }

    pub fn news(&self, ticker: &str, options: NewsOptions) -> String {
        self.block_on("news", ticker, self.inner.news(ticker, options))
    }

    pub fn filtered_news(&self, ticker: &str, options: FilteredNewsOptions) -> String {
        self.block_on(
            "filtered news",
            ticker,
            self.inner.filtered_news(ticker, options),
        )
    }

    fn block_on<F>(&self, kind: &str, ticker: &str, future: F) -> String
    where
        F: Future<Output = String>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            error!(ticker, kind, "blocking entry point called inside an async runtime");
            return format!(
                "Unified interface error while fetching {kind} for {ticker}: \
                 blocking call made from within an async runtime"
            );
        }
        self.runtime.block_on(future)
    }
}
