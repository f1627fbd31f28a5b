//! Per-request context shared by every provider of one chain execution.
//!
//! Dates are computed exactly once when the context is built, so every
//! provider in a chain observes the same "as-of" day even if the wall clock
//! rolls over while the chain runs.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::domain::{classify, normalize_ticker, MarketCategory, MarketInfo};
use crate::ValidationError;

/// Look-back window used for fundamentals requests.
pub const FUNDAMENTALS_LOOKBACK_DAYS: i64 = 365;
pub const DEFAULT_NEWS_HOURS_BACK: u32 = 6;
pub const DEFAULT_NEWS_LOOKBACK_DAYS: u32 = 7;
pub const DEFAULT_MAX_NEWS_ITEMS: usize = 10;
pub const DEFAULT_MIN_NEWS_SCORE: f64 = 30.0;

/// Which router table serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Fundamentals,
    News,
}

impl RequestKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fundamentals => "fundamentals",
            Self::News => "news",
        }
    }
}

impl Display for RequestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fundamentals" => Ok(Self::Fundamentals),
            "news" => Ok(Self::News),
            other => Err(ValidationError::InvalidRequestKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Tunables for news requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsOptions {
    pub hours_back: u32,
    pub look_back_days: u32,
}

impl Default for NewsOptions {
    fn default() -> Self {
        Self {
            hours_back: DEFAULT_NEWS_HOURS_BACK,
            look_back_days: DEFAULT_NEWS_LOOKBACK_DAYS,
        }
    }
}

/// Tunables for the filtered news pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredNewsOptions {
    pub max_items: usize,
    pub min_score: f64,
    pub use_semantic: bool,
    pub use_local_model: bool,
}

impl Default for FilteredNewsOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_NEWS_ITEMS,
            min_score: DEFAULT_MIN_NEWS_SCORE,
            use_semantic: true,
            use_local_model: false,
        }
    }
}

impl FilteredNewsOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_items == 0 {
            return Err(ValidationError::ZeroMaxItems);
        }
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(ValidationError::MinScoreOutOfRange {
                value: self.min_score,
            });
        }
        Ok(())
    }
}

/// Immutable bundle of derived request parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContext {
    pub ticker: String,
    pub kind: RequestKind,
    pub market: MarketInfo,
    pub start_date: Date,
    pub end_date: Date,
    pub as_of: Date,
    pub hours_back: Option<u32>,
    pub look_back_days: Option<u32>,
    pub max_items: Option<usize>,
}

impl RequestContext {
    pub const fn category(&self) -> MarketCategory {
        self.market.category
    }
}

/// Builds [`RequestContext`] values from raw tickers.
///
/// `today` is captured from the UTC clock unless pinned with
/// [`ContextBuilder::with_today`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder {
    today: Option<Date>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn fundamentals(&self, raw_ticker: &str) -> RequestContext {
        let today = self.today();
        self.base(raw_ticker, RequestKind::Fundamentals, today, FUNDAMENTALS_LOOKBACK_DAYS)
    }

    pub fn news(&self, raw_ticker: &str, options: NewsOptions) -> RequestContext {
        let today = self.today();
        let mut context = self.base(
            raw_ticker,
            RequestKind::News,
            today,
            i64::from(options.look_back_days),
        );
        context.hours_back = Some(options.hours_back);
        context.look_back_days = Some(options.look_back_days);
        context
    }

    pub fn filtered_news(&self, raw_ticker: &str, options: &FilteredNewsOptions) -> RequestContext {
        let mut context = self.news(raw_ticker, NewsOptions::default());
        context.max_items = Some(options.max_items);
        context
    }

    fn base(
        &self,
        raw_ticker: &str,
        kind: RequestKind,
        today: Date,
        look_back_days: i64,
    ) -> RequestContext {
        let ticker = normalize_ticker(raw_ticker);
        let market = classify(&ticker).info();
        let start_date = today
            .checked_sub(Duration::days(look_back_days))
            .unwrap_or(Date::MIN);

        RequestContext {
            ticker,
            kind,
            market,
            start_date,
            end_date: today,
            as_of: today,
            hours_back: None,
            look_back_days: None,
            max_items: None,
        }
    }

    fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }
}
