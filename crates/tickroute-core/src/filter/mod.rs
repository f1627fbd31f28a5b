//! News relevance filtering.
//!
//! [`RelevanceFilter`] scores raw news rows against one ticker on a 0-100
//! scale. Construction may read a lexicon file from disk, so instances are
//! built once per [`FilterKey`] and shared through [`FilterCache`].
//!
//! Scoring layers:
//!
//! | Layer | Enabled by | Effect |
//! |-------|------------|--------|
//! | keyword | always | ticker mentions, financial terms, noise penalties |
//! | semantic | `use_semantic` | overlap with a reference term index |
//! | local model | `use_local_model` | weighted lexicon |

mod cache;
mod lexicon;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::domain::{normalize_ticker, NewsItem, ScoredNews};

pub use cache::{FilterCache, DEFAULT_FILTER_CACHE_CAPACITY};
pub use lexicon::Lexicon;

const TITLE_MENTION_SCORE: f64 = 40.0;
const CONTENT_MENTION_SCORE: f64 = 20.0;
const FINANCIAL_TERM_SCORE: f64 = 8.0;
const FINANCIAL_TERM_CAP: f64 = 32.0;
const NOISE_PENALTY: f64 = 25.0;
const SEMANTIC_WEIGHT: f64 = 20.0;
const LEXICON_CAP: f64 = 20.0;

const FINANCIAL_TERMS: &[&str] = &[
    "earnings",
    "revenue",
    "profit",
    "dividend",
    "guidance",
    "acquisition",
    "merger",
    "buyback",
    "results",
    "forecast",
    "业绩",
    "营收",
    "利润",
    "分红",
    "公告",
    "回购",
    "财报",
];

const NOISE_TERMS: &[&str] = &[
    "sponsored",
    "advertisement",
    "promotion",
    "lottery",
    "广告",
    "推广",
    "彩票",
    "开户",
];

/// Failures while constructing a [`RelevanceFilter`].
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed to load local model '{}': {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lexicon '{}' at line {line}: {reason}", path.display())]
    InvalidLexicon {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("filter construction task failed: {0}")]
    Construction(String),
}

/// Cache key: normalized ticker plus the option flags that change scoring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterKey {
    pub ticker: String,
    pub use_semantic: bool,
    pub use_local_model: bool,
}

impl FilterKey {
    pub fn new(ticker: &str, use_semantic: bool, use_local_model: bool) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            use_semantic,
            use_local_model,
        }
    }
}

/// Stateful per-ticker relevance scorer.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    key: FilterKey,
    aliases: Vec<String>,
    semantic_index: Option<HashSet<String>>,
    lexicon: Option<Lexicon>,
}

impl RelevanceFilter {
    /// Builds a filter, reading the local model lexicon when enabled.
    ///
    /// Blocking: call from `spawn_blocking` in async code.
    pub fn build(key: FilterKey, local_model_path: Option<&Path>) -> Result<Self, FilterError> {
        let aliases = ticker_aliases(&key.ticker);
        let semantic_index = key
            .use_semantic
            .then(|| semantic_index(&aliases));
        let lexicon = if key.use_local_model {
            Some(match local_model_path {
                Some(path) => Lexicon::load(path)?,
                None => Lexicon::builtin(),
            })
        } else {
            None
        };

        Ok(Self {
            key,
            aliases,
            semantic_index,
            lexicon,
        })
    }

    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    pub fn score(&self, item: &NewsItem) -> f64 {
        let title = item.title.to_lowercase();
        let content = item.content.to_lowercase();
        let text = format!("{title} {content}");

        let mut score = 0.0;
        if self.mentions(&title) {
            score += TITLE_MENTION_SCORE;
        }
        if self.mentions(&content) {
            score += CONTENT_MENTION_SCORE;
        }

        let financial_hits = FINANCIAL_TERMS
            .iter()
            .filter(|term| text.contains(*term))
            .count();
        score += (financial_hits as f64 * FINANCIAL_TERM_SCORE).min(FINANCIAL_TERM_CAP);

        let noise_hits = NOISE_TERMS.iter().filter(|term| text.contains(*term)).count();
        score -= noise_hits as f64 * NOISE_PENALTY;

        if let Some(index) = &self.semantic_index {
            score += SEMANTIC_WEIGHT * overlap(index, &text);
        }
        if let Some(lexicon) = &self.lexicon {
            score += lexicon.weigh(&text).clamp(-LEXICON_CAP, LEXICON_CAP);
        }

        score.clamp(0.0, 100.0)
    }

    /// Scores every item, keeps those at or above `min_score`, highest first.
    pub fn filter(&self, items: Vec<NewsItem>, min_score: f64) -> Vec<ScoredNews> {
        let mut scored = items
            .into_iter()
            .map(|item| {
                let score = self.score(&item);
                ScoredNews { item, score }
            })
            .filter(|scored| scored.score >= min_score)
            .collect::<Vec<_>>();
        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored
    }

    fn mentions(&self, text: &str) -> bool {
        self.aliases.iter().any(|alias| text.contains(alias.as_str()))
    }
}

/// Lower-cased spellings a headline may use for the ticker.
fn ticker_aliases(ticker: &str) -> Vec<String> {
    let lower = ticker.to_lowercase();
    let mut aliases = vec![lower.clone()];

    let code = lower
        .strip_prefix("sh")
        .or_else(|| lower.strip_prefix("sz"))
        .or_else(|| lower.strip_suffix(".hk"))
        .unwrap_or(&lower);
    if code != lower {
        aliases.push(code.to_owned());
    }
    let unpadded = code.trim_start_matches('0');
    if unpadded != code && unpadded.len() >= 3 {
        aliases.push(unpadded.to_owned());
    }

    aliases.retain(|alias| !alias.is_empty());
    aliases
}

fn semantic_index(aliases: &[String]) -> HashSet<String> {
    FINANCIAL_TERMS
        .iter()
        .map(|term| (*term).to_owned())
        .chain(aliases.iter().cloned())
        .collect()
}

/// Fraction of the index (capped at eight terms) present in `text`.
fn overlap(index: &HashSet<String>, text: &str) -> f64 {
    let hits = index.iter().filter(|term| text.contains(term.as_str())).count();
    (hits as f64 / 8.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn plain(ticker: &str) -> RelevanceFilter {
        RelevanceFilter::build(FilterKey::new(ticker, false, false), None).expect("builds")
    }

    #[test]
    fn key_normalizes_ticker() {
        assert_eq!(FilterKey::new(" sh600519 ", true, false).ticker, "SH600519");
    }

    #[test]
    fn title_mentions_outweigh_unrelated_news() {
        let filter = plain("600519");
        let related = NewsItem::new("600519 annual results beat forecast", "");
        let unrelated = NewsItem::new("Weather outlook for the weekend", "sunny");

        assert!(filter.score(&related) >= 50.0);
        assert_eq!(filter.score(&unrelated), 0.0);
    }

    #[test]
    fn exchange_and_padding_aliases_match() {
        let filter = plain("0700.HK");
        assert!(filter.score(&NewsItem::new("HKEX: 700 closes higher", "")) >= TITLE_MENTION_SCORE);
    }

    #[test]
    fn noise_is_penalized_and_clamped() {
        let filter = plain("AAPL");
        let advert = NewsItem::new("Sponsored lottery promotion", "aapl");
        assert_eq!(filter.score(&advert), 0.0);
    }

    #[test]
    fn filter_sorts_descending_and_applies_threshold() {
        let filter = plain("AAPL");
        let items = vec![
            NewsItem::new("Market wrap", "aapl mentioned in passing"),
            NewsItem::new("AAPL earnings and revenue beat", "aapl dividend raised"),
            NewsItem::new("Unrelated", "nothing"),
        ];

        let kept = filter.filter(items, 15.0);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].item.title, "AAPL earnings and revenue beat");
        assert!(kept[0].score > kept[1].score);
    }

    #[test]
    fn semantic_layer_adds_overlap_bonus() {
        let item = NewsItem::new("AAPL earnings", "revenue and profit guidance");
        let base = plain("AAPL").score(&item);
        let semantic = RelevanceFilter::build(FilterKey::new("AAPL", true, false), None)
            .expect("builds")
            .score(&item);
        assert!(semantic > base);
    }

    #[test]
    fn local_model_reads_lexicon_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "recall\t-15").expect("write lexicon");

        let filter = RelevanceFilter::build(
            FilterKey::new("AAPL", false, true),
            Some(file.path()),
        )
        .expect("lexicon loads");
        let item = NewsItem::new("AAPL earnings", "product recall announced");

        assert!(filter.score(&item) < plain("AAPL").score(&item));
    }

    #[test]
    fn missing_lexicon_file_is_a_model_load_error() {
        let err = RelevanceFilter::build(
            FilterKey::new("AAPL", false, true),
            Some(Path::new("/nonexistent/lexicon.tsv")),
        )
        .expect_err("missing file");
        assert!(matches!(err, FilterError::ModelLoad { .. }));
    }
}
