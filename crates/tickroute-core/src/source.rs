use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical provider identifiers used by route tables and the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Combined A-share price + fundamentals report.
    AshareCombined,
    /// A-share daily price history (sub-fetch of the combined provider).
    AsharePrice,
    /// A-share fundamentals report (sub-fetch of the combined provider).
    AshareFundamentals,
    /// Finnhub fundamentals, US-style symbols.
    Finnhub,
    /// Yahoo Finance fundamentals plus price history, US-style symbols.
    Yahoo,
    /// Model-assisted web search for fundamentals.
    ModelSearch,
    AkshareHk,
    YahooHk,
    FinnhubHk,
    /// Realtime aggregated news sources.
    RealtimeNews,
    /// General news search keyed by ticker.
    GoogleNews,
    /// Model-assisted global/macro news search.
    GlobalModelNews,
    FinnhubNews,
    /// Row-oriented stock news feed consumed by the filtered news pipeline.
    StockNewsFeed,
}

impl ProviderId {
    pub const ALL: [Self; 14] = [
        Self::AshareCombined,
        Self::AsharePrice,
        Self::AshareFundamentals,
        Self::Finnhub,
        Self::Yahoo,
        Self::ModelSearch,
        Self::AkshareHk,
        Self::YahooHk,
        Self::FinnhubHk,
        Self::RealtimeNews,
        Self::GoogleNews,
        Self::GlobalModelNews,
        Self::FinnhubNews,
        Self::StockNewsFeed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AshareCombined => "ashare_combined",
            Self::AsharePrice => "ashare_price",
            Self::AshareFundamentals => "ashare_fundamentals",
            Self::Finnhub => "finnhub",
            Self::Yahoo => "yahoo",
            Self::ModelSearch => "model_search",
            Self::AkshareHk => "akshare_hk",
            Self::YahooHk => "yahoo_hk",
            Self::FinnhubHk => "finnhub_hk",
            Self::RealtimeNews => "realtime_news",
            Self::GoogleNews => "google_news",
            Self::GlobalModelNews => "global_model_news",
            Self::FinnhubNews => "finnhub_news",
            Self::StockNewsFeed => "stock_news_feed",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidProvider {
                value: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for provider in ProviderId::ALL {
            assert_eq!(provider.as_str().parse::<ProviderId>(), Ok(provider));
        }
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "bloomberg".parse::<ProviderId>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidProvider { .. }));
    }
}
