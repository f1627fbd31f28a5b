//! CLI argument definitions for tickroute.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fundamentals` | Fundamentals report through the market's fallback chain |
//! | `news` | News report through the market's fallback chain |
//! | `filtered-news` | Relevance-filtered news table |
//! | `classify` | Market bucket of one or more tickers |
//! | `routes` | Provider priority tables |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | none | JSON settings file |
//! | `--gateway-url` | none | Data gateway base URL |
//! | `--log-level` | `info` | Log level when `RUST_LOG` is unset |
//! | `--log-format` | `pretty` | `pretty` or `json` |
//!
//! # Examples
//!
//! ```bash
//! tickroute fundamentals 600519
//! tickroute news AAPL --hours-back 12
//! tickroute filtered-news 0700.HK --max-items 5 --min-score 40
//! tickroute classify 600519 0700.HK AAPL
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickroute_core::context::{
    DEFAULT_MAX_NEWS_ITEMS, DEFAULT_MIN_NEWS_SCORE, DEFAULT_NEWS_HOURS_BACK,
    DEFAULT_NEWS_LOOKBACK_DAYS,
};
use tickroute_core::RequestKind;

/// Market-aware stock report CLI with ordered provider fallback.
#[derive(Debug, Parser)]
#[command(
    name = "tickroute",
    author,
    version,
    about = "Market-aware stock fundamentals and news reports",
    long_about = "tickroute classifies a ticker into its market (A-share, HK-share, US-share) \
and fetches fundamentals or news through that market's ordered provider chain. \
When every provider fails, a market-specific notice is printed instead of an error.\n\
\n\
Use 'tickroute <command> --help' for command-specific help."
)]
pub struct Cli {
    /// JSON settings file; `TICKROUTE_*` environment variables override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data gateway base URL. Without one every provider is unconfigured.
    #[arg(long, global = true)]
    pub gateway_url: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl LogFormatArg {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestKindArg {
    Fundamentals,
    News,
}

impl From<RequestKindArg> for RequestKind {
    fn from(value: RequestKindArg) -> Self {
        match value {
            RequestKindArg::Fundamentals => Self::Fundamentals,
            RequestKindArg::News => Self::News,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 📈 Fundamentals report for one ticker.
    ///
    /// # Examples
    ///
    ///   tickroute fundamentals 600519
    ///   tickroute fundamentals 0700.HK
    Fundamentals(TickerArgs),

    /// 📰 News report for one ticker.
    ///
    /// # Examples
    ///
    ///   tickroute news AAPL
    ///   tickroute news 600519 --hours-back 24
    News(NewsArgs),

    /// 🔍 Relevance-filtered news for one ticker.
    ///
    /// # Examples
    ///
    ///   tickroute filtered-news AAPL --max-items 5
    ///   tickroute filtered-news 600519 --no-semantic --local-model
    FilteredNews(FilteredNewsArgs),

    /// 🏷️ Print the market bucket of each ticker.
    Classify(ClassifyArgs),

    /// 🔌 Print provider priority tables.
    Routes(RoutesArgs),
}

#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Raw ticker, e.g. 600519, 0700.HK, AAPL.
    pub ticker: String,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    pub ticker: String,

    /// Realtime window in hours.
    #[arg(long, default_value_t = DEFAULT_NEWS_HOURS_BACK)]
    pub hours_back: u32,

    /// Search window in days.
    #[arg(long, default_value_t = DEFAULT_NEWS_LOOKBACK_DAYS)]
    pub look_back_days: u32,
}

#[derive(Debug, Args)]
pub struct FilteredNewsArgs {
    pub ticker: String,

    /// Maximum rows requested from the feed and kept in the table.
    #[arg(long, default_value_t = DEFAULT_MAX_NEWS_ITEMS)]
    pub max_items: usize,

    /// Minimum relevance score (0-100).
    #[arg(long, default_value_t = DEFAULT_MIN_NEWS_SCORE)]
    pub min_score: f64,

    /// Disable the semantic overlap layer.
    #[arg(long, default_value_t = false)]
    pub no_semantic: bool,

    /// Enable the local lexicon layer.
    #[arg(long, default_value_t = false)]
    pub local_model: bool,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RoutesArgs {
    /// Only print the table for this request kind.
    #[arg(long, value_enum)]
    pub kind: Option<RequestKindArg>,

    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}
