use serde::Serialize;

use tickroute_core::{routes, MarketCategory, ProviderId, RequestKind};

use crate::cli::RoutesArgs;
use crate::error::CliError;

use super::to_json;

#[derive(Debug, Serialize)]
struct RouteRow {
    kind: RequestKind,
    market: MarketCategory,
    providers: &'static [ProviderId],
    terminal: String,
}

pub fn run(args: &RoutesArgs) -> Result<String, CliError> {
    let kinds = match args.kind {
        Some(kind) => vec![RequestKind::from(kind)],
        None => vec![RequestKind::Fundamentals, RequestKind::News],
    };

    let rows = kinds
        .into_iter()
        .flat_map(routes)
        .map(|plan| RouteRow {
            kind: plan.kind,
            market: plan.category,
            providers: plan.providers,
            terminal: plan.sentinel.message("{ticker}"),
        })
        .collect::<Vec<_>>();

    to_json(&rows, args.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RequestKindArg;
    use serde_json::Value;

    #[test]
    fn news_table_lists_three_markets() {
        let args = RoutesArgs {
            kind: Some(RequestKindArg::News),
            pretty: false,
        };

        let output: Value = serde_json::from_str(&run(&args).expect("renders")).expect("json");
        let rows = output.as_array().expect("array");

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row["kind"] == "news"));
        assert_eq!(rows[2]["providers"][0], "global_model_news");
    }
}
