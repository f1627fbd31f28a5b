use serde::Serialize;

use tickroute_core::{classify, normalize_ticker, MarketCategory, MarketInfo};

use crate::cli::ClassifyArgs;
use crate::error::CliError;

use super::{require_ticker, to_json};

#[derive(Debug, Serialize)]
struct Classification {
    ticker: String,
    market: MarketCategory,
    info: MarketInfo,
}

pub fn run(args: &ClassifyArgs) -> Result<String, CliError> {
    let rows = args
        .tickers
        .iter()
        .map(|raw| {
            let ticker = require_ticker(raw)?;
            let market = classify(ticker);
            Ok(Classification {
                ticker: normalize_ticker(ticker),
                market,
                info: market.info(),
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    to_json(&rows, args.pretty)
}
