//! Declarative route tables.
//!
//! Every (request kind, market) pair maps to one [`RoutePlan`]: an ordered
//! provider list, a terminal sentinel and an optional section heading. The
//! order encodes per-market source reliability and is never re-ranked at
//! runtime.

use crate::context::RequestKind;
use crate::domain::MarketCategory;
use crate::ProviderId;

/// Substring present in every fundamentals sentinel message.
pub const DATA_UNAVAILABLE_MARKER: &str = "data unavailable";
/// Prefix of the news sentinel message.
pub const NO_NEWS_MARKER: &str = "No significant news found";

pub const HK_SECTION_HEADING: &str = "## 🇭🇰 HK-share data";
pub const US_SECTION_HEADING: &str = "## 🇺🇸 US-share data";

/// Always-succeeding final entry of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    MarketDataUnavailable(MarketCategory),
    NoSignificantNews,
}

impl Sentinel {
    pub fn message(self, ticker: &str) -> String {
        match self {
            Self::MarketDataUnavailable(category) => {
                format!("{} {ticker} {DATA_UNAVAILABLE_MARKER}", category.label())
            }
            Self::NoSignificantNews => {
                format!("{NO_NEWS_MARKER} for {ticker} from available sources.")
            }
        }
    }
}

/// Fixed provider priority for one (kind, market) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePlan {
    pub kind: RequestKind,
    pub category: MarketCategory,
    pub providers: &'static [ProviderId],
    pub sentinel: Sentinel,
    /// Heading wrapped around the chain output, if the market has one.
    pub section_heading: Option<&'static str>,
}

const FUNDAMENTALS_ROUTES: [RoutePlan; 3] = [
    RoutePlan {
        kind: RequestKind::Fundamentals,
        category: MarketCategory::AShare,
        providers: &[ProviderId::AshareCombined],
        sentinel: Sentinel::MarketDataUnavailable(MarketCategory::AShare),
        section_heading: None,
    },
    RoutePlan {
        kind: RequestKind::Fundamentals,
        category: MarketCategory::HkShare,
        providers: &[
            ProviderId::Yahoo,
            ProviderId::Finnhub,
            ProviderId::AkshareHk,
            ProviderId::YahooHk,
            ProviderId::FinnhubHk,
        ],
        sentinel: Sentinel::MarketDataUnavailable(MarketCategory::HkShare),
        section_heading: Some(HK_SECTION_HEADING),
    },
    RoutePlan {
        kind: RequestKind::Fundamentals,
        category: MarketCategory::UsShare,
        providers: &[ProviderId::Finnhub, ProviderId::Yahoo, ProviderId::ModelSearch],
        sentinel: Sentinel::MarketDataUnavailable(MarketCategory::UsShare),
        section_heading: Some(US_SECTION_HEADING),
    },
];

const NEWS_ROUTES: [RoutePlan; 3] = [
    RoutePlan {
        kind: RequestKind::News,
        category: MarketCategory::AShare,
        providers: &[
            ProviderId::RealtimeNews,
            ProviderId::GoogleNews,
            ProviderId::GlobalModelNews,
        ],
        sentinel: Sentinel::NoSignificantNews,
        section_heading: None,
    },
    RoutePlan {
        kind: RequestKind::News,
        category: MarketCategory::HkShare,
        providers: &[
            ProviderId::GoogleNews,
            ProviderId::GlobalModelNews,
            ProviderId::RealtimeNews,
        ],
        sentinel: Sentinel::NoSignificantNews,
        section_heading: None,
    },
    RoutePlan {
        kind: RequestKind::News,
        category: MarketCategory::UsShare,
        providers: &[
            ProviderId::GlobalModelNews,
            ProviderId::GoogleNews,
            ProviderId::FinnhubNews,
        ],
        sentinel: Sentinel::NoSignificantNews,
        section_heading: None,
    },
];

/// All plans for one request kind, in [`MarketCategory::ALL`] order.
pub fn routes(kind: RequestKind) -> &'static [RoutePlan] {
    match kind {
        RequestKind::Fundamentals => &FUNDAMENTALS_ROUTES,
        RequestKind::News => &NEWS_ROUTES,
    }
}

pub fn route(kind: RequestKind, category: MarketCategory) -> &'static RoutePlan {
    let table = routes(kind);
    match category {
        MarketCategory::AShare => &table[0],
        MarketCategory::HkShare => &table[1],
        MarketCategory::UsShare => &table[2],
    }
}
