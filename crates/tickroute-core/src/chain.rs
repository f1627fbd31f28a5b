//! Ordered-fallback execution engine.
//!
//! A [`FallbackChain`] walks its providers strictly in order. A provider is
//! only invoked after the previous one has returned, and the first accepted
//! result ends the walk. When every provider fails the chain's sentinel
//! message is returned instead, so [`FallbackChain::execute`] is infallible.
//!
//! A result is rejected when the provider errors, returns blank content, or
//! (when [`FailurePolicy::min_content_len`] is non-zero) returns trimmed
//! content shorter than the threshold. The length check is a heuristic for
//! "no meaningful news" and is configurable for that reason.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::{RequestContext, RequestKind};
use crate::provider::{Provider, ProviderError, ProviderRequest};
use crate::registry::ProviderRegistry;
use crate::routing::{RoutePlan, Sentinel};
use crate::ProviderId;

/// Minimum trimmed length a news result must reach to be accepted.
pub const DEFAULT_MIN_NEWS_LEN: usize = 50;

/// Content checks applied to every provider result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Zero disables the length check; blank content is always rejected.
    pub min_content_len: usize,
}

impl FailurePolicy {
    pub const fn non_empty() -> Self {
        Self { min_content_len: 0 }
    }

    pub const fn min_len(min_content_len: usize) -> Self {
        Self { min_content_len }
    }

    /// Fundamentals only reject blank content; news also enforces
    /// `min_news_len`.
    pub const fn for_kind(kind: RequestKind, min_news_len: usize) -> Self {
        match kind {
            RequestKind::Fundamentals => Self::non_empty(),
            RequestKind::News => Self::min_len(min_news_len),
        }
    }

    pub fn accept(&self, content: String) -> Result<String, ProviderError> {
        let trimmed_len = content.trim().chars().count();
        if trimmed_len == 0 {
            return Err(ProviderError::empty_result());
        }
        if trimmed_len < self.min_content_len {
            return Err(ProviderError::content_too_short(
                trimmed_len,
                self.min_content_len,
            ));
        }
        Ok(content)
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::non_empty()
    }
}

/// One provider invocation (or skipped slot) within a chain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub provider: ProviderId,
    pub latency_ms: u64,
    pub error_code: Option<&'static str>,
    pub error: Option<String>,
}

impl Attempt {
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a chain run. `provider_used` is `None` when the sentinel answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainOutcome {
    pub content: String,
    pub provider_used: Option<ProviderId>,
    pub attempts: Vec<Attempt>,
    pub latency_ms: u64,
}

impl ChainOutcome {
    pub const fn used_sentinel(&self) -> bool {
        self.provider_used.is_none()
    }

    pub fn failed_attempts(&self) -> usize {
        self.attempts.iter().filter(|attempt| !attempt.succeeded()).count()
    }
}

enum Slot {
    Ready(Arc<dyn Provider>),
    Missing(ProviderId),
}

impl Slot {
    fn id(&self) -> ProviderId {
        match self {
            Self::Ready(provider) => provider.id(),
            Self::Missing(id) => *id,
        }
    }
}

/// Ordered providers plus a terminal sentinel.
pub struct FallbackChain {
    slots: Vec<Slot>,
    sentinel: Sentinel,
    policy: FailurePolicy,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn Provider>>, sentinel: Sentinel) -> Self {
        Self {
            slots: providers.into_iter().map(Slot::Ready).collect(),
            sentinel,
            policy: FailurePolicy::default(),
        }
    }

    /// Resolves a route plan against a registry, keeping plan order.
    pub fn from_plan(plan: &RoutePlan, registry: &ProviderRegistry) -> Self {
        let slots = plan
            .providers
            .iter()
            .map(|id| match registry.get(*id) {
                Some(provider) => Slot::Ready(provider),
                None => Slot::Missing(*id),
            })
            .collect();
        Self {
            slots,
            sentinel: plan.sentinel,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.slots.iter().map(Slot::id).collect()
    }

    pub const fn sentinel(&self) -> Sentinel {
        self.sentinel
    }

    pub async fn execute(&self, context: &RequestContext) -> ChainOutcome {
        let started = Instant::now();
        let mut attempts = Vec::with_capacity(self.slots.len());

        for slot in &self.slots {
            let provider_id = slot.id();
            let attempt_started = Instant::now();

            let result = match slot {
                Slot::Ready(provider) => {
                    debug!(
                        provider = %provider_id,
                        ticker = %context.ticker,
                        kind = %context.kind,
                        "invoking provider"
                    );
                    let request = ProviderRequest::project(context, provider.inputs());
                    match provider.fetch(request).await {
                        Ok(content) => self.policy.accept(content),
                        Err(error) => Err(error),
                    }
                }
                Slot::Missing(id) => Err(ProviderError::not_registered(*id)),
            };
            let latency_ms = elapsed_ms(attempt_started);

            match result {
                Ok(content) => {
                    let failed_attempts = attempts.len();
                    attempts.push(Attempt {
                        provider: provider_id,
                        latency_ms,
                        error_code: None,
                        error: None,
                    });
                    if failed_attempts > 0 {
                        info!(
                            provider = %provider_id,
                            ticker = %context.ticker,
                            latency_ms,
                            failed_attempts,
                            "fallback succeeded with '{}' after {} failed attempt(s)",
                            provider_id,
                            failed_attempts
                        );
                    } else {
                        info!(
                            provider = %provider_id,
                            ticker = %context.ticker,
                            latency_ms,
                            failed_attempts,
                            "provider succeeded"
                        );
                    }

                    return ChainOutcome {
                        content,
                        provider_used: Some(provider_id),
                        attempts,
                        latency_ms: elapsed_ms(started),
                    };
                }
                Err(error) => {
                    warn!(
                        provider = %provider_id,
                        ticker = %context.ticker,
                        latency_ms,
                        code = error.code(),
                        error = %error,
                        "provider attempt failed"
                    );
                    attempts.push(Attempt {
                        provider: provider_id,
                        latency_ms,
                        error_code: Some(error.code()),
                        error: Some(error.message().to_owned()),
                    });
                }
            }
        }

        warn!(
            ticker = %context.ticker,
            kind = %context.kind,
            failed_attempts = attempts.len(),
            "all providers failed, using terminal message"
        );

        ChainOutcome {
            content: self.sentinel.message(&context.ticker),
            provider_used: None,
            attempts,
            latency_ms: elapsed_ms(started),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FnProvider;
    use crate::context::{ContextBuilder, NewsOptions};
    use crate::domain::MarketCategory;
    use crate::routing::route;

    fn ok(id: ProviderId, content: &str) -> Arc<dyn Provider> {
        Arc::new(FnProvider::returning(id, content))
    }

    fn failing(id: ProviderId) -> Arc<dyn Provider> {
        Arc::new(FnProvider::failing(
            id,
            ProviderError::unavailable("simulated outage"),
        ))
    }

    #[tokio::test]
    async fn first_success_wins() {
        let chain = FallbackChain::new(
            vec![
                ok(ProviderId::Finnhub, "finnhub report"),
                ok(ProviderId::Yahoo, "yahoo report"),
            ],
            Sentinel::MarketDataUnavailable(MarketCategory::UsShare),
        );
        let outcome = chain.execute(&ContextBuilder::new().fundamentals("AAPL")).await;

        assert_eq!(outcome.content, "finnhub report");
        assert_eq!(outcome.provider_used, Some(ProviderId::Finnhub));
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[tokio::test]
    async fn failures_advance_to_next_provider() {
        let chain = FallbackChain::new(
            vec![
                failing(ProviderId::Finnhub),
                ok(ProviderId::Yahoo, "   "),
                ok(ProviderId::ModelSearch, "search report"),
            ],
            Sentinel::MarketDataUnavailable(MarketCategory::UsShare),
        );
        let outcome = chain.execute(&ContextBuilder::new().fundamentals("AAPL")).await;

        assert_eq!(outcome.content, "search report");
        assert_eq!(outcome.failed_attempts(), 2);
        assert_eq!(outcome.attempts[0].error_code, Some("provider.unavailable"));
        assert_eq!(outcome.attempts[1].error_code, Some("provider.empty_result"));
    }

    #[tokio::test]
    async fn exhaustion_returns_sentinel() {
        let chain = FallbackChain::new(
            vec![failing(ProviderId::Yahoo)],
            Sentinel::MarketDataUnavailable(MarketCategory::HkShare),
        );
        let outcome = chain.execute(&ContextBuilder::new().fundamentals("0700.HK")).await;

        assert!(outcome.used_sentinel());
        assert_eq!(outcome.content, "HK-share 0700.HK data unavailable");
    }

    #[tokio::test]
    async fn short_news_is_rejected_under_length_policy() {
        let chain = FallbackChain::new(
            vec![
                ok(ProviderId::RealtimeNews, "no news"),
                ok(
                    ProviderId::GoogleNews,
                    "Kweichow Moutai reported quarterly revenue growth above expectations.",
                ),
            ],
            Sentinel::NoSignificantNews,
        )
        .with_policy(FailurePolicy::for_kind(RequestKind::News, DEFAULT_MIN_NEWS_LEN));
        let context = ContextBuilder::new().news("600519", NewsOptions::default());

        let outcome = chain.execute(&context).await;

        assert_eq!(outcome.provider_used, Some(ProviderId::GoogleNews));
        assert_eq!(
            outcome.attempts[0].error_code,
            Some("provider.content_too_short")
        );
    }

    #[tokio::test]
    async fn unregistered_plan_entries_are_skipped() {
        let registry = ProviderRegistry::builder()
            .with_provider(FnProvider::returning(ProviderId::ModelSearch, "search report"))
            .build();
        let plan = route(RequestKind::Fundamentals, MarketCategory::UsShare);
        let chain = FallbackChain::from_plan(plan, &registry);

        assert_eq!(
            chain.provider_ids(),
            vec![ProviderId::Finnhub, ProviderId::Yahoo, ProviderId::ModelSearch]
        );
        let outcome = chain.execute(&ContextBuilder::new().fundamentals("AAPL")).await;

        assert_eq!(outcome.provider_used, Some(ProviderId::ModelSearch));
        assert!(outcome.attempts[..2]
            .iter()
            .all(|attempt| attempt.error_code == Some("provider.not_registered")));
    }

    #[test]
    fn policy_counts_trimmed_characters() {
        let policy = FailurePolicy::min_len(5);
        assert!(policy.accept(String::from("  abcd  ")).is_err());
        assert!(policy.accept(String::from("  abcde ")).is_ok());
        assert!(FailurePolicy::non_empty().accept(String::from("\n")).is_err());
    }
}
