use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{
    AShareCombinedProvider, GatewayNewsFeed, GatewayProvider, TimeoutProvider,
    UnconfiguredNewsFeed, UnconfiguredProvider,
};
use crate::context::RequestKind;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{NewsFeed, Provider};
use crate::{ProviderId, Settings};

/// Provider lookup used by fallback chains.
///
/// An id with no entry is reported by the chain as a
/// `provider.not_registered` attempt and skipped.
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn Provider>>,
    news_feed: Arc<dyn NewsFeed>,
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Registry wired from settings: gateway adapters when a gateway URL is
    /// configured, [`UnconfiguredProvider`] placeholders for every other id.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut builder = Self::builder().with_unconfigured_defaults();
        if let Some(gateway_url) = settings.gateway_url.as_deref() {
            builder = builder.with_gateway(
                gateway_url,
                Arc::new(ReqwestHttpClient::new()),
                settings.request_timeout_ms,
            );
        }
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn Provider>> {
        self.providers.get(&id).cloned()
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    pub fn news_feed(&self) -> Arc<dyn NewsFeed> {
        Arc::clone(&self.news_feed)
    }

    /// Registered ids in stable name order.
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids = self.providers.keys().copied().collect::<Vec<_>>();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builder().with_unconfigured_defaults().build()
    }
}

struct GatewayConfig {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

/// Builder for [`ProviderRegistry`].
///
/// Explicit providers always win over gateway adapters, which win over
/// unconfigured placeholders.
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    providers: HashMap<ProviderId, Arc<dyn Provider>>,
    news_feed: Option<Arc<dyn NewsFeed>>,
    gateway: Option<GatewayConfig>,
    timeout: Option<Duration>,
    unconfigured_defaults: bool,
}

impl ProviderRegistryBuilder {
    pub fn with_provider(self, provider: impl Provider + 'static) -> Self {
        self.with_shared_provider(Arc::new(provider))
    }

    pub fn with_shared_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn with_news_feed(mut self, news_feed: impl NewsFeed + 'static) -> Self {
        self.news_feed = Some(Arc::new(news_feed));
        self
    }

    pub fn with_gateway(
        mut self,
        base_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
        timeout_ms: u64,
    ) -> Self {
        self.gateway = Some(GatewayConfig {
            base_url: base_url.into(),
            http_client,
            timeout_ms,
        });
        self
    }

    /// Wraps every registered provider in a [`TimeoutProvider`]. The combined
    /// A-share provider is composed from the wrapped sub-providers instead.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_unconfigured_defaults(mut self) -> Self {
        self.unconfigured_defaults = true;
        self
    }

    pub fn build(self) -> ProviderRegistry {
        let mut providers = self.providers;

        if let Some(gateway) = &self.gateway {
            for id in ProviderId::ALL {
                if id == ProviderId::StockNewsFeed || id == ProviderId::AshareCombined {
                    continue;
                }
                providers.entry(id).or_insert_with(|| -> Arc<dyn Provider> {
                    Arc::new(
                        GatewayProvider::new(
                            id,
                            gateway_kind(id),
                            gateway.base_url.clone(),
                            Arc::clone(&gateway.http_client),
                        )
                        .with_timeout_ms(gateway.timeout_ms),
                    )
                });
            }
        }

        // The combined A-share provider is composed below from the wrapped
        // sub-providers and is not wrapped itself.
        if let Some(timeout) = self.timeout {
            providers = providers
                .into_iter()
                .map(|(id, provider)| {
                    if id == ProviderId::AshareCombined {
                        return (id, provider);
                    }
                    let wrapped: Arc<dyn Provider> =
                        Arc::new(TimeoutProvider::new(provider, timeout));
                    (id, wrapped)
                })
                .collect();
        }

        if !providers.contains_key(&ProviderId::AshareCombined) {
            let price = providers.get(&ProviderId::AsharePrice).cloned();
            let fundamentals = providers.get(&ProviderId::AshareFundamentals).cloned();
            if price.is_some() || fundamentals.is_some() {
                let combined = AShareCombinedProvider::new(
                    price.unwrap_or_else(|| unconfigured(ProviderId::AsharePrice)),
                    fundamentals.unwrap_or_else(|| unconfigured(ProviderId::AshareFundamentals)),
                );
                providers.insert(ProviderId::AshareCombined, Arc::new(combined));
            }
        }

        if self.unconfigured_defaults {
            for id in ProviderId::ALL {
                if id != ProviderId::StockNewsFeed {
                    providers.entry(id).or_insert_with(|| unconfigured(id));
                }
            }
        }

        let news_feed = self
            .news_feed
            .or_else(|| {
                self.gateway.as_ref().map(|gateway| {
                    let feed: Arc<dyn NewsFeed> = Arc::new(
                        GatewayNewsFeed::new(
                            gateway.base_url.clone(),
                            Arc::clone(&gateway.http_client),
                        )
                        .with_timeout_ms(gateway.timeout_ms),
                    );
                    feed
                })
            })
            .unwrap_or_else(|| Arc::new(UnconfiguredNewsFeed::new(ProviderId::StockNewsFeed)));

        ProviderRegistry {
            providers,
            news_feed,
        }
    }
}

fn unconfigured(id: ProviderId) -> Arc<dyn Provider> {
    Arc::new(UnconfiguredProvider::new(id))
}

fn gateway_kind(id: ProviderId) -> RequestKind {
    match id {
        ProviderId::RealtimeNews
        | ProviderId::GoogleNews
        | ProviderId::GlobalModelNews
        | ProviderId::FinnhubNews
        | ProviderId::StockNewsFeed => RequestKind::News,
        _ => RequestKind::Fundamentals,
    }
}
