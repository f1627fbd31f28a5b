use std::sync::Arc;

use tracing::debug;

use crate::context::RequestKind;
use crate::domain::NewsItem;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::provider::{InputShape, NewsFeed, Provider, ProviderError, ProviderFuture, ProviderRequest};
use crate::ProviderId;

/// Generic HTTP adapter for a fetcher exposed by a data gateway.
///
/// Issues `GET {base_url}/{kind}/{provider_id}?ticker=...` with one query
/// pair per projected context field and returns the text body.
#[derive(Clone)]
pub struct GatewayProvider {
    id: ProviderId,
    kind: RequestKind,
    inputs: InputShape,
    base_url: String,
    timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
}

impl GatewayProvider {
    pub fn new(
        id: ProviderId,
        kind: RequestKind,
        base_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            id,
            kind,
            inputs: InputShape::for_provider(id),
            base_url: base_url.into(),
            timeout_ms: 10_000,
            http_client,
        }
    }

    pub fn with_inputs(mut self, inputs: InputShape) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint_url(&self, request: &ProviderRequest) -> String {
        let query = encode_query(&request.query_pairs());
        format!(
            "{}/{}/{}?{query}",
            self.base_url.trim_end_matches('/'),
            self.kind,
            self.id
        )
    }
}

impl Provider for GatewayProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn inputs(&self) -> InputShape {
        self.inputs
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let url = self.endpoint_url(&request);
            debug!(provider = %self.id, %url, "requesting gateway report");

            let http_request = HttpRequest::get(url)
                .with_header("accept", "text/plain, text/markdown")
                .with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(http_request)
                .await
                .map_err(|error| transport_error(error, self.timeout_ms))?;

            success_body(self.id, response)
        })
    }
}

/// Row-oriented news feed served by the gateway as a JSON array.
#[derive(Clone)]
pub struct GatewayNewsFeed {
    id: ProviderId,
    base_url: String,
    timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
}

impl GatewayNewsFeed {
    pub fn new(base_url: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            id: ProviderId::StockNewsFeed,
            base_url: base_url.into(),
            timeout_ms: 10_000,
            http_client,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint_url(&self, request: &ProviderRequest) -> String {
        let mut url = format!(
            "{}/news_feed/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&request.ticker)
        );
        if let Some(max_items) = request.max_items {
            url.push_str(&format!("?max_items={max_items}"));
        }
        url
    }
}

impl NewsFeed for GatewayNewsFeed {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn fetch_news<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, Vec<NewsItem>> {
        Box::pin(async move {
            let url = self.endpoint_url(&request);
            debug!(provider = %self.id, %url, "requesting gateway news rows");

            let http_request = HttpRequest::get(url)
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(http_request)
                .await
                .map_err(|error| transport_error(error, self.timeout_ms))?;
            let body = success_body(self.id, response)?;

            serde_json::from_str::<Vec<NewsItem>>(&body).map_err(|error| {
                ProviderError::invalid_response(format!(
                    "news feed '{}' returned malformed rows: {error}",
                    self.id
                ))
            })
        })
    }
}

fn encode_query(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn transport_error(error: HttpError, timeout_ms: u64) -> ProviderError {
    if error.timed_out() {
        ProviderError::timeout(timeout_ms)
    } else {
        ProviderError::unavailable(error.message())
    }
}

fn success_body(id: ProviderId, response: HttpResponse) -> Result<String, ProviderError> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(ProviderError::unavailable(format!(
            "gateway responded with status {} for '{id}'",
            response.status
        )))
    }
}
