//! # Domain Models
//!
//! Market classification and the row types exchanged with news feeds.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MarketCategory`] | A-share / HK-share / US-share bucket |
//! | [`MarketInfo`] | Display name and currency of a market |
//! | [`NewsItem`] | Raw article returned by a news feed |
//! | [`ScoredNews`] | Article annotated with a relevance score |
//!
//! Classification is total: [`classify`] never fails and falls back to
//! [`MarketCategory::UsShare`] for anything it does not recognize.
//!
//! ```rust
//! use tickroute_core::{classify, MarketCategory};
//!
//! assert_eq!(classify("600519"), MarketCategory::AShare);
//! assert_eq!(classify("0700.HK"), MarketCategory::HkShare);
//! assert_eq!(classify("AAPL"), MarketCategory::UsShare);
//! ```

mod market;
mod news;

pub use market::{classify, normalize_ticker, MarketCategory, MarketInfo};
pub use news::{NewsItem, ScoredNews};
