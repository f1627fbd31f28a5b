use tickroute_core::{FilteredNewsOptions, NewsOptions, ReportService};

use crate::cli::{FilteredNewsArgs, NewsArgs, TickerArgs};
use crate::error::CliError;

use super::require_ticker;

pub async fn fundamentals(args: &TickerArgs, service: &ReportService) -> Result<String, CliError> {
    let ticker = require_ticker(&args.ticker)?;
    Ok(service.fundamentals(ticker).await)
}

pub async fn news(args: &NewsArgs, service: &ReportService) -> Result<String, CliError> {
    let ticker = require_ticker(&args.ticker)?;
    let options = NewsOptions {
        hours_back: args.hours_back,
        look_back_days: args.look_back_days,
    };
    Ok(service.news(ticker, options).await)
}

pub async fn filtered_news(
    args: &FilteredNewsArgs,
    service: &ReportService,
) -> Result<String, CliError> {
    let ticker = require_ticker(&args.ticker)?;
    let options = FilteredNewsOptions {
        max_items: args.max_items,
        min_score: args.min_score,
        use_semantic: !args.no_semantic,
        use_local_model: args.local_model,
    };
    options.validate()?;

    Ok(service.filtered_news(ticker, options).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroute_core::ProviderRegistry;

    fn offline_service() -> ReportService {
        ReportService::new(ProviderRegistry::default())
    }

    #[tokio::test]
    async fn unconfigured_fundamentals_print_sentinel_report() {
        let args = TickerArgs {
            ticker: String::from("AAPL"),
        };
        let report = fundamentals(&args, &offline_service())
            .await
            .expect("report renders");

        assert!(report.contains("US-share AAPL data unavailable"));
    }

    #[tokio::test]
    async fn out_of_range_score_is_a_validation_error() {
        let args = FilteredNewsArgs {
            ticker: String::from("AAPL"),
            max_items: 5,
            min_score: 140.0,
            no_semantic: false,
            local_model: false,
        };
        let error = filtered_news(&args, &offline_service())
            .await
            .expect_err("must fail");

        assert_eq!(error.exit_code(), 2);
    }
}
