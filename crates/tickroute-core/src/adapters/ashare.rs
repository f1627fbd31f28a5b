use std::sync::Arc;

use tracing::warn;

use crate::provider::{InputShape, Provider, ProviderError, ProviderFuture, ProviderRequest};
use crate::ProviderId;

pub const ASHARE_PRICE_HEADING: &str = "## A-share price data";
pub const ASHARE_FUNDAMENTALS_HEADING: &str = "## A-share fundamentals";

/// Combined A-share report: price history followed by fundamentals.
///
/// Unlike the other markets, a failing sub-fetch does not fail the provider.
/// The failure is written inline under that section's heading and the other
/// section is still fetched, so the report keeps its shape.
#[derive(Clone)]
pub struct AShareCombinedProvider {
    price: Arc<dyn Provider>,
    fundamentals: Arc<dyn Provider>,
}

impl AShareCombinedProvider {
    pub fn new(price: Arc<dyn Provider>, fundamentals: Arc<dyn Provider>) -> Self {
        Self {
            price,
            fundamentals,
        }
    }

    async fn section(
        provider: &dyn Provider,
        heading: &str,
        request: &ProviderRequest,
    ) -> String {
        let outcome = provider
            .fetch(request.narrow(provider.inputs()))
            .await
            .and_then(|content| {
                if content.trim().is_empty() {
                    Err(ProviderError::empty_result())
                } else {
                    Ok(content)
                }
            });

        match outcome {
            Ok(content) => format!("{heading}\n{content}"),
            Err(error) => {
                warn!(
                    provider = %provider.id(),
                    ticker = %request.ticker,
                    code = error.code(),
                    error = %error,
                    "A-share sub-fetch failed"
                );
                format!("{heading}\nFetch failed: {error}")
            }
        }
    }
}

impl Provider for AShareCombinedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::AshareCombined
    }

    fn inputs(&self) -> InputShape {
        self.price.inputs().union(self.fundamentals.inputs())
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let price =
                Self::section(self.price.as_ref(), ASHARE_PRICE_HEADING, &request).await;
            let fundamentals = Self::section(
                self.fundamentals.as_ref(),
                ASHARE_FUNDAMENTALS_HEADING,
                &request,
            )
            .await;

            Ok(format!("{price}\n\n{fundamentals}"))
        })
    }
}
