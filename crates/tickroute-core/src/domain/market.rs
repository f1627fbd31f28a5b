use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Six-digit code prefixes that identify Shanghai/Shenzhen listings.
const A_SHARE_PREFIXES: [&str; 4] = ["00", "30", "60", "68"];
/// Exchange letter prefixes accepted in front of a six-digit A-share code.
const A_SHARE_EXCHANGES: [&str; 2] = ["SZ", "SH"];
const HK_SUFFIX: &str = ".HK";

/// Market bucket driving which fallback chain serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCategory {
    AShare,
    HkShare,
    UsShare,
}

impl MarketCategory {
    pub const ALL: [Self; 3] = [Self::AShare, Self::HkShare, Self::UsShare];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AShare => "a_share",
            Self::HkShare => "hk_share",
            Self::UsShare => "us_share",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AShare => "A-share",
            Self::HkShare => "HK-share",
            Self::UsShare => "US-share",
        }
    }

    /// Static market metadata for this category.
    pub const fn info(self) -> MarketInfo {
        match self {
            Self::AShare => MarketInfo {
                category: self,
                code: "CN",
                market_name: "China A-share",
                currency_name: "Chinese Yuan",
                currency_symbol: "¥",
            },
            Self::HkShare => MarketInfo {
                category: self,
                code: "HK",
                market_name: "Hong Kong",
                currency_name: "Hong Kong Dollar",
                currency_symbol: "HK$",
            },
            Self::UsShare => MarketInfo {
                category: self,
                code: "US",
                market_name: "United States",
                currency_name: "US Dollar",
                currency_symbol: "$",
            },
        }
    }
}

impl Display for MarketCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MarketCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "a_share" | "cn" => Ok(Self::AShare),
            "hk_share" | "hk" => Ok(Self::HkShare),
            "us_share" | "us" => Ok(Self::UsShare),
            _ => Err(ValidationError::InvalidMarket {
                value: value.to_owned(),
            }),
        }
    }
}

/// Display metadata attached to every report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketInfo {
    pub category: MarketCategory,
    pub code: &'static str,
    pub market_name: &'static str,
    pub currency_name: &'static str,
    pub currency_symbol: &'static str,
}

/// Trims surrounding whitespace and upper-cases a raw ticker.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Maps a raw ticker to its market. Total: anything unrecognized is US-share.
pub fn classify(raw: &str) -> MarketCategory {
    let ticker = normalize_ticker(raw);

    if is_a_share(&ticker) {
        MarketCategory::AShare
    } else if is_hk_share(&ticker) {
        MarketCategory::HkShare
    } else {
        MarketCategory::UsShare
    }
}

fn is_a_share(ticker: &str) -> bool {
    if ticker.len() == 6 && all_digits(ticker) {
        return A_SHARE_PREFIXES
            .iter()
            .any(|prefix| ticker.starts_with(prefix));
    }

    A_SHARE_EXCHANGES.iter().any(|exchange| {
        ticker
            .strip_prefix(exchange)
            .is_some_and(|code| code.len() == 6 && all_digits(code))
    })
}

fn is_hk_share(ticker: &str) -> bool {
    let code = ticker.strip_suffix(HK_SUFFIX).unwrap_or(ticker);
    (4..=5).contains(&code.len()) && all_digits(code)
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_exchange_codes_are_a_share() {
        for ticker in ["600519", "000001", "300750", "688981", "SH600519", "sz000001"] {
            assert_eq!(classify(ticker), MarketCategory::AShare, "{ticker}");
        }
    }

    #[test]
    fn six_digit_code_with_unknown_prefix_is_not_a_share() {
        assert_eq!(classify("900901"), MarketCategory::UsShare);
        assert_eq!(classify("BJ830799"), MarketCategory::UsShare);
    }

    #[test]
    fn hk_suffix_and_short_codes_are_hk_share() {
        for ticker in ["0700.HK", "09988.hk", "0700", "00700", " 1810 "] {
            assert_eq!(classify(ticker), MarketCategory::HkShare, "{ticker}");
        }
    }

    #[test]
    fn everything_else_defaults_to_us_share() {
        for ticker in ["AAPL", "brk.b", "123", "1234567", ".HK", "", "   "] {
            assert_eq!(classify(ticker), MarketCategory::UsShare, "{ticker:?}");
        }
    }

    #[test]
    fn market_info_matches_category() {
        let info = MarketCategory::HkShare.info();
        assert_eq!(info.category, MarketCategory::HkShare);
        assert_eq!(info.currency_symbol, "HK$");
    }

    #[test]
    fn parses_category_names() {
        assert_eq!("a-share".parse::<MarketCategory>(), Ok(MarketCategory::AShare));
        assert_eq!("HK".parse::<MarketCategory>(), Ok(MarketCategory::HkShare));
        assert!("mars".parse::<MarketCategory>().is_err());
    }
}
