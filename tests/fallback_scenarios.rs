//! Behavior tests for market routing and ordered fallback.
//!
//! Providers here are in-memory recorders, so every test can assert both the
//! report that comes out and which providers were (or were not) invoked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickroute_core::{
    adapters::{ASHARE_FUNDAMENTALS_HEADING, ASHARE_PRICE_HEADING},
    ContextBuilder, FailurePolicy, FallbackChain, FnProvider, InputShape, NewsOptions, Provider,
    ProviderError, ProviderFuture, ProviderId, ProviderRegistry, ProviderRequest, ReportService,
    RequestKind, Sentinel,
};
use time::{Date, Month};

/// Provider stub that counts calls and keeps the last request it saw.
struct RecordingProvider {
    id: ProviderId,
    inputs: InputShape,
    response: Result<String, ProviderError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl RecordingProvider {
    fn ok(id: ProviderId, content: &str) -> Arc<Self> {
        Self::with_response(id, Ok(content.to_owned()))
    }

    fn failing(id: ProviderId) -> Arc<Self> {
        Self::with_response(
            id,
            Err(ProviderError::unavailable(format!("{id} upstream is down"))),
        )
    }

    fn with_response(id: ProviderId, response: Result<String, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            id,
            inputs: InputShape::for_provider(id),
            response,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<ProviderRequest> {
        self.last_request.lock().expect("request lock").clone()
    }
}

impl Provider for RecordingProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn inputs(&self) -> InputShape {
        self.inputs
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().expect("request lock") = Some(request);
            self.response.clone()
        })
    }
}

fn pinned_contexts() -> ContextBuilder {
    let today = Date::from_calendar_date(2024, Month::March, 15).expect("valid date");
    ContextBuilder::new().with_today(today)
}

fn service(registry: ProviderRegistry) -> ReportService {
    ReportService::new(registry).with_context_builder(pinned_contexts())
}

fn registry_of(providers: &[&Arc<RecordingProvider>]) -> ProviderRegistry {
    providers
        .iter()
        .fold(ProviderRegistry::builder(), |builder, provider| {
            builder.with_shared_provider(Arc::clone(*provider) as Arc<dyn Provider>)
        })
        .build()
}

// =============================================================================
// A-share fundamentals
// =============================================================================

#[tokio::test]
async fn ashare_fundamentals_keep_report_shape_when_price_fetch_fails() {
    // Given: the A-share price source is down but fundamentals work
    let price = RecordingProvider::failing(ProviderId::AsharePrice);
    let fundamentals = RecordingProvider::ok(ProviderId::AshareFundamentals, "ROE 31.2%");
    let finnhub = RecordingProvider::ok(ProviderId::Finnhub, "should not be used");
    let service = service(registry_of(&[&price, &fundamentals, &finnhub]));

    // When: fundamentals are requested for Kweichow Moutai
    let report = service.fundamentals("600519").await;

    // Then: both sections are present, the failed one carries an inline note
    assert!(report.starts_with("# 600519 Fundamentals Report"));
    assert!(report.contains(&format!("{ASHARE_PRICE_HEADING}\nFetch failed:")));
    assert!(report.contains(&format!("{ASHARE_FUNDAMENTALS_HEADING}\nROE 31.2%")));
    assert!(report.contains("Chinese Yuan (¥)"));
    assert!(report.contains("**Report date**: 2024-03-15"));

    // And: only the combined provider's sub-fetches ran
    assert_eq!(price.calls(), 1);
    assert_eq!(fundamentals.calls(), 1);
    assert_eq!(finnhub.calls(), 0);
}

#[tokio::test]
async fn ashare_price_fetch_receives_one_year_window() {
    let price = RecordingProvider::ok(ProviderId::AsharePrice, "close 1688.00");
    let fundamentals = RecordingProvider::ok(ProviderId::AshareFundamentals, "PE 28");
    let service = service(registry_of(&[&price, &fundamentals]));

    service.fundamentals("sh600519").await;

    let request = price.last_request().expect("price was called");
    assert_eq!(request.ticker, "SH600519");
    assert_eq!(
        request.start_date.map(|date| date.to_string()).as_deref(),
        Some("2023-03-16")
    );
    assert_eq!(
        request.end_date.map(|date| date.to_string()).as_deref(),
        Some("2024-03-15")
    );

    // Fundamentals declares no optional inputs and sees none.
    let request = fundamentals.last_request().expect("fundamentals was called");
    assert_eq!(request.start_date, None);
    assert_eq!(request.as_of, None);
}

#[tokio::test]
async fn slow_ashare_price_times_out_inline_under_registry_timeout() {
    // Given: a price source slower than the registry's per-call timeout
    let slow_price = FnProvider::new(
        ProviderId::AsharePrice,
        InputShape::for_provider(ProviderId::AsharePrice),
        |_| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(String::from("close 1688.00"))
        },
    );
    let registry = ProviderRegistry::builder()
        .with_provider(slow_price)
        .with_provider(FnProvider::returning(ProviderId::AshareFundamentals, "PE 28.1"))
        .with_timeout(Duration::from_millis(100))
        .build();

    // When: fundamentals are requested
    let report = service(registry).fundamentals("600519").await;

    // Then: the price section carries the timeout, fundamentals survive
    assert!(report.contains(&format!("{ASHARE_PRICE_HEADING}\nFetch failed:")));
    assert!(report.contains("provider.timeout"));
    assert!(report.contains(&format!("{ASHARE_FUNDAMENTALS_HEADING}\nPE 28.1")));
    assert!(!report.contains("data unavailable"));
}

// =============================================================================
// HK-share fundamentals
// =============================================================================

#[tokio::test]
async fn hk_fundamentals_fall_through_to_third_provider() {
    // Given: Yahoo and Finnhub fail for a Hong Kong ticker, AKShare(HK) works
    let yahoo = RecordingProvider::failing(ProviderId::Yahoo);
    let finnhub = RecordingProvider::failing(ProviderId::Finnhub);
    let akshare_hk = RecordingProvider::ok(ProviderId::AkshareHk, "Tencent revenue HK$609bn");
    let yahoo_hk = RecordingProvider::ok(ProviderId::YahooHk, "should not be used");
    let finnhub_hk = RecordingProvider::ok(ProviderId::FinnhubHk, "should not be used");
    let service = service(registry_of(&[&yahoo, &finnhub, &akshare_hk, &yahoo_hk, &finnhub_hk]));

    // When: fundamentals are requested
    let report = service.fundamentals("0700.HK").await;

    // Then: AKShare(HK) content appears under the HK header
    assert!(report.contains("## 🇭🇰 HK-share data\nTencent revenue HK$609bn"));
    assert!(report.contains("Hong Kong Dollar (HK$)"));

    // And: later providers were never invoked
    assert_eq!((yahoo.calls(), finnhub.calls(), akshare_hk.calls()), (1, 1, 1));
    assert_eq!(yahoo_hk.calls(), 0);
    assert_eq!(finnhub_hk.calls(), 0);
}

#[tokio::test]
async fn first_success_short_circuits_the_chain() {
    let finnhub = RecordingProvider::ok(ProviderId::Finnhub, "P/E 29.4");
    let yahoo = RecordingProvider::ok(ProviderId::Yahoo, "should not be used");
    let model_search = RecordingProvider::ok(ProviderId::ModelSearch, "should not be used");
    let registry = registry_of(&[&finnhub, &yahoo, &model_search]);

    let context = pinned_contexts().fundamentals("AAPL");
    let outcome = ReportService::new(registry).run_chain(&context).await;

    assert_eq!(outcome.content, "P/E 29.4");
    assert_eq!(outcome.provider_used, Some(ProviderId::Finnhub));
    assert_eq!(outcome.failed_attempts(), 0);
    assert_eq!(yahoo.calls() + model_search.calls(), 0);
}

#[tokio::test]
async fn exhausted_fundamentals_chain_reports_market_sentinel() {
    let report = service(ProviderRegistry::default()).fundamentals("0700.HK").await;

    assert!(report.contains("## 🇭🇰 HK-share data\nHK-share 0700.HK data unavailable"));
    assert!(report.contains("*Data source: multi-source chain with fallback*"));
}

// =============================================================================
// News
// =============================================================================

#[tokio::test]
async fn us_news_with_every_provider_failing_reports_no_significant_news() {
    // Given: all three US news providers fail
    let global = RecordingProvider::failing(ProviderId::GlobalModelNews);
    let google = RecordingProvider::failing(ProviderId::GoogleNews);
    let finnhub = RecordingProvider::failing(ProviderId::FinnhubNews);
    let service = service(registry_of(&[&global, &google, &finnhub]));

    // When: news is requested for AAPL
    let report = service.news("AAPL", NewsOptions::default()).await;

    // Then: the terminal sentinel is returned, after trying each provider once
    assert_eq!(
        report,
        "No significant news found for AAPL from available sources."
    );
    assert_eq!((global.calls(), google.calls(), finnhub.calls()), (1, 1, 1));
}

#[tokio::test]
async fn short_news_content_counts_as_failure() {
    let realtime = RecordingProvider::ok(ProviderId::RealtimeNews, "no news");
    let google = RecordingProvider::ok(
        ProviderId::GoogleNews,
        "Kweichow Moutai raises dividend after record annual profit, shares climb 3%",
    );
    let service = service(registry_of(&[&realtime, &google]));

    let report = service.news("600519", NewsOptions::default()).await;

    assert!(report.starts_with("Kweichow Moutai raises dividend"));
    assert_eq!(realtime.calls(), 1);
}

#[tokio::test]
async fn realtime_news_receives_hours_back_but_not_look_back() {
    let realtime = RecordingProvider::ok(
        ProviderId::RealtimeNews,
        "Flash: 600519 board approves buyback programme worth CNY 3bn over twelve months",
    );
    let service = service(registry_of(&[&realtime]));
    let options = NewsOptions {
        hours_back: 12,
        look_back_days: 3,
    };

    service.news("600519", options).await;

    let request = realtime.last_request().expect("realtime was called");
    assert_eq!(request.hours_back, Some(12));
    assert_eq!(request.look_back_days, None);
    assert_eq!(
        request.as_of.map(|date| date.to_string()).as_deref(),
        Some("2024-03-15")
    );
}

// =============================================================================
// Chain diagnostics
// =============================================================================

#[tokio::test]
async fn attempts_record_codes_in_plan_order() {
    let yahoo = RecordingProvider::failing(ProviderId::Yahoo);
    let registry = registry_of(&[&yahoo]);
    let plan = tickroute_core::route(RequestKind::Fundamentals, tickroute_core::MarketCategory::UsShare);
    let chain = FallbackChain::from_plan(plan, &registry).with_policy(FailurePolicy::non_empty());

    let outcome = chain.execute(&pinned_contexts().fundamentals("AAPL")).await;

    assert!(outcome.used_sentinel());
    assert_eq!(outcome.content, Sentinel::MarketDataUnavailable(plan.category).message("AAPL"));
    let codes = outcome
        .attempts
        .iter()
        .map(|attempt| (attempt.provider, attempt.error_code))
        .collect::<Vec<_>>();
    assert_eq!(
        codes,
        vec![
            (ProviderId::Finnhub, Some("provider.not_registered")),
            (ProviderId::Yahoo, Some("provider.unavailable")),
            (ProviderId::ModelSearch, Some("provider.not_registered")),
        ]
    );
}
