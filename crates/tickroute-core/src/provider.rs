//! Provider contract and request projection.
//!
//! This module defines the narrow interface every data-source collaborator
//! implements. The fallback chain only ever talks to [`Provider`] and
//! [`NewsFeed`]; vendor specifics live behind them.
//!
//! # Input shapes
//!
//! Each provider declares the context fields it consumes through an
//! [`InputShape`]. The chain projects the shared [`RequestContext`] through
//! that shape, so a provider never sees fields it did not ask for.
//!
//! | Field | Example consumer |
//! |-------|------------------|
//! | ticker | always present |
//! | start/end date | price history fetchers |
//! | as-of date | fundamentals snapshots |
//! | hours back | realtime news aggregation |
//! | look-back days | news search |
//! | max items | row-oriented news feeds |
//!
//! # Example
//!
//! ```rust,ignore
//! use tickroute_core::{InputShape, Provider, ProviderFuture, ProviderId, ProviderRequest};
//!
//! struct MyAdapter;
//!
//! impl Provider for MyAdapter {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Finnhub
//!     }
//!
//!     fn inputs(&self) -> InputShape {
//!         InputShape::ticker_only().with_as_of()
//!     }
//!
//!     fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
//!         Box::pin(async move { Ok(format!("report for {}", request.ticker)) })
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use time::Date;

use crate::context::RequestContext;
use crate::domain::{MarketInfo, NewsItem};
use crate::ProviderId;

/// Boxed future returned by provider calls.
pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Context fields a provider consumes. The ticker is always included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InputShape {
    pub date_range: bool,
    pub as_of: bool,
    pub hours_back: bool,
    pub look_back_days: bool,
    pub max_items: bool,
}

impl InputShape {
    pub const fn ticker_only() -> Self {
        Self {
            date_range: false,
            as_of: false,
            hours_back: false,
            look_back_days: false,
            max_items: false,
        }
    }

    pub const fn full() -> Self {
        Self {
            date_range: true,
            as_of: true,
            hours_back: true,
            look_back_days: true,
            max_items: true,
        }
    }

    pub const fn with_date_range(mut self) -> Self {
        self.date_range = true;
        self
    }

    pub const fn with_as_of(mut self) -> Self {
        self.as_of = true;
        self
    }

    pub const fn with_hours_back(mut self) -> Self {
        self.hours_back = true;
        self
    }

    pub const fn with_look_back_days(mut self) -> Self {
        self.look_back_days = true;
        self
    }

    pub const fn with_max_items(mut self) -> Self {
        self.max_items = true;
        self
    }

    /// Declared inputs of the built-in provider ids.
    pub const fn for_provider(id: ProviderId) -> Self {
        let base = Self::ticker_only();
        match id {
            ProviderId::AshareCombined | ProviderId::AsharePrice => base.with_date_range(),
            ProviderId::AshareFundamentals => base,
            ProviderId::Finnhub | ProviderId::ModelSearch | ProviderId::GlobalModelNews => {
                base.with_as_of()
            }
            ProviderId::Yahoo => base.with_as_of().with_date_range(),
            ProviderId::AkshareHk | ProviderId::YahooHk | ProviderId::FinnhubHk => {
                base.with_date_range()
            }
            ProviderId::RealtimeNews => base.with_as_of().with_hours_back(),
            ProviderId::GoogleNews | ProviderId::FinnhubNews => {
                base.with_as_of().with_look_back_days()
            }
            ProviderId::StockNewsFeed => base.with_max_items(),
        }
    }

    pub const fn union(self, other: Self) -> Self {
        Self {
            date_range: self.date_range || other.date_range,
            as_of: self.as_of || other.as_of,
            hours_back: self.hours_back || other.hours_back,
            look_back_days: self.look_back_days || other.look_back_days,
            max_items: self.max_items || other.max_items,
        }
    }
}

/// Provider input projected from a [`RequestContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub ticker: String,
    pub market: MarketInfo,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub as_of: Option<Date>,
    pub hours_back: Option<u32>,
    pub look_back_days: Option<u32>,
    pub max_items: Option<usize>,
}

impl ProviderRequest {
    pub fn project(context: &RequestContext, shape: InputShape) -> Self {
        Self {
            ticker: context.ticker.clone(),
            market: context.market,
            start_date: shape.date_range.then_some(context.start_date),
            end_date: shape.date_range.then_some(context.end_date),
            as_of: shape.as_of.then_some(context.as_of),
            hours_back: context.hours_back.filter(|_| shape.hours_back),
            look_back_days: context.look_back_days.filter(|_| shape.look_back_days),
            max_items: context.max_items.filter(|_| shape.max_items),
        }
    }

    /// Drops every field `shape` does not declare.
    pub fn narrow(&self, shape: InputShape) -> Self {
        Self {
            ticker: self.ticker.clone(),
            market: self.market,
            start_date: self.start_date.filter(|_| shape.date_range),
            end_date: self.end_date.filter(|_| shape.date_range),
            as_of: self.as_of.filter(|_| shape.as_of),
            hours_back: self.hours_back.filter(|_| shape.hours_back),
            look_back_days: self.look_back_days.filter(|_| shape.look_back_days),
            max_items: self.max_items.filter(|_| shape.max_items),
        }
    }

    /// Query pairs for the fields that were projected, ticker first.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("ticker", self.ticker.clone())];
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_string()));
        }
        if let Some(as_of) = self.as_of {
            pairs.push(("curr_date", as_of.to_string()));
        }
        if let Some(hours) = self.hours_back {
            pairs.push(("hours_back", hours.to_string()));
        }
        if let Some(days) = self.look_back_days {
            pairs.push(("look_back_days", days.to_string()));
        }
        if let Some(max_items) = self.max_items {
            pairs.push(("max_items", max_items.to_string()));
        }
        pairs
    }
}

/// Provider-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    NotConfigured,
    NotRegistered,
    Unavailable,
    EmptyResult,
    ContentTooShort,
    Timeout,
    InvalidResponse,
    Internal,
}

/// Structured provider failure. The chain treats every kind as "try next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    pub fn not_configured(provider: ProviderId) -> Self {
        Self {
            kind: ProviderErrorKind::NotConfigured,
            message: format!("provider '{provider}' has no backing client configured"),
        }
    }

    pub fn not_registered(provider: ProviderId) -> Self {
        Self {
            kind: ProviderErrorKind::NotRegistered,
            message: format!("provider '{provider}' is not registered"),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn empty_result() -> Self {
        Self {
            kind: ProviderErrorKind::EmptyResult,
            message: String::from("provider returned no content"),
        }
    }

    pub fn content_too_short(len: usize, min: usize) -> Self {
        Self {
            kind: ProviderErrorKind::ContentTooShort,
            message: format!("content length {len} is below the minimum of {min}"),
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            kind: ProviderErrorKind::Timeout,
            message: format!("provider call exceeded {timeout_ms}ms"),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::NotConfigured => "provider.not_configured",
            ProviderErrorKind::NotRegistered => "provider.not_registered",
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::EmptyResult => "provider.empty_result",
            ProviderErrorKind::ContentTooShort => "provider.content_too_short",
            ProviderErrorKind::Timeout => "provider.timeout",
            ProviderErrorKind::InvalidResponse => "provider.invalid_response",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// Report-producing data source.
///
/// Implementations must be `Send + Sync`; one instance serves concurrent
/// requests for different tickers.
pub trait Provider: Send + Sync {
    /// Returns the provider identifier used by route tables.
    fn id(&self) -> ProviderId;

    /// Context fields this provider consumes.
    fn inputs(&self) -> InputShape;

    /// Produces a report fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] for every expected failure (missing data,
    /// transport errors, unconfigured client). Providers must not panic on
    /// those paths.
    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String>;
}

/// Row-oriented news source consumed by the filtered news pipeline.
pub trait NewsFeed: Send + Sync {
    fn id(&self) -> ProviderId;

    fn fetch_news<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, Vec<NewsItem>>;
}
