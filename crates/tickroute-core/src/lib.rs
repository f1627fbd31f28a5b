//! # Tickroute Core
//!
//! Market-aware routing and ordered fallback for stock fundamentals and news
//! reports.
//!
//! ## Overview
//!
//! A raw ticker is classified into a market bucket (A-share, HK-share,
//! US-share). The bucket selects an ordered provider chain; the chain tries
//! each provider in turn and returns the first acceptable result, or a
//! market-specific sentinel message when every provider fails.
//!
//! - **Market classification** for raw ticker strings
//! - **Provider contract** with declared input shapes
//! - **Fallback chains** with per-attempt diagnostics
//! - **Report assembly** with market and currency metadata
//! - **Filtered news** with a bounded, shared cache of relevance filters
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Gateway, closure, timeout and A-share composite providers |
//! | [`chain`] | Ordered fallback execution |
//! | [`context`] | Request context and option types |
//! | [`domain`] | Market classification and news rows |
//! | [`error`] | Core error types |
//! | [`filter`] | News relevance scoring and filter cache |
//! | [`http_client`] | HTTP client abstraction |
//! | [`logging`] | Subscriber setup for binaries |
//! | [`provider`] | Provider and news feed traits |
//! | [`registry`] | Provider lookup by identifier |
//! | [`report`] | Report formatting |
//! | [`routing`] | Static route tables per market |
//! | [`service`] | Public entry points |
//! | [`settings`] | File and environment configuration |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickroute_core::{ProviderRegistry, ReportService, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let service = ReportService::from_settings(&settings);
//!
//!     println!("{}", service.fundamentals("0700.HK").await);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ReportService  │────▶│  Route tables    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ FallbackChain   │────▶│ ProviderRegistry │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Report assembly │     │ Gateway / HTTP   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Data unavailability never surfaces as `Err` from the service: chains
//! degrade into sentinel text. Provider failures are typed so chains and
//! callers can tell them apart:
//!
//! ```rust
//! use tickroute_core::{ProviderError, ProviderErrorKind, ProviderId};
//!
//! let error = ProviderError::not_configured(ProviderId::Finnhub);
//! assert_eq!(error.kind(), ProviderErrorKind::NotConfigured);
//! assert_eq!(error.code(), "provider.not_configured");
//! ```

pub mod adapters;
pub mod chain;
pub mod context;
pub mod domain;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod report;
pub mod routing;
pub mod service;
pub mod settings;
pub mod source;

// Adapter implementations
pub use adapters::{
    AShareCombinedProvider, FnNewsFeed, FnProvider, GatewayNewsFeed, GatewayProvider,
    TimeoutProvider, UnconfiguredNewsFeed, UnconfiguredProvider,
};

// Chain execution
pub use chain::{Attempt, ChainOutcome, FailurePolicy, FallbackChain, DEFAULT_MIN_NEWS_LEN};

// Request context
pub use context::{
    ContextBuilder, FilteredNewsOptions, NewsOptions, RequestContext, RequestKind,
};

// Domain models
pub use domain::{classify, normalize_ticker, MarketCategory, MarketInfo, NewsItem, ScoredNews};

// Errors
pub use error::{ConfigError, CoreError, ValidationError};

// Filtering
pub use filter::{FilterCache, FilterError, FilterKey, RelevanceFilter};

// HTTP
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Provider contract
pub use provider::{
    InputShape, NewsFeed, Provider, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderRequest,
};

// Registry and routing
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use routing::{route, routes, RoutePlan, Sentinel};

// Reports and services
pub use report::{format_filtered_news, format_report};
pub use service::{BlockingReportService, ReportService};
pub use settings::Settings;
pub use source::ProviderId;
