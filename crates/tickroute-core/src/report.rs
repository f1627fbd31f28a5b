use time::Date;

use crate::domain::{MarketInfo, ScoredNews};

pub const REPORT_FOOTER: &str = "*Data source: multi-source chain with fallback*";

/// Assembles the final fundamentals/news report.
///
/// Sections are expected to carry their own sub-headings and are joined in
/// the given order. Pure string assembly.
pub fn format_report(ticker: &str, market: &MarketInfo, as_of: Date, sections: &[String]) -> String {
    let body = sections.join("\n");
    format!(
        "# {ticker} Fundamentals Report\n\n\
         **Market**: {}\n\
         **Currency**: {} ({})\n\
         **Report date**: {as_of}\n\n\
         {body}\n\n\
         ---\n\
         {REPORT_FOOTER}\n",
        market.market_name, market.currency_name, market.currency_symbol
    )
}

/// Wraps chain output in a market section heading when one is configured.
pub fn labelled_section(heading: Option<&str>, content: String) -> String {
    match heading {
        Some(heading) => format!("{heading}\n{content}"),
        None => content,
    }
}

/// Markdown table report for the filtered news pipeline.
pub fn format_filtered_news(ticker: &str, items: &[ScoredNews]) -> String {
    let mut report = format!("# Enhanced News Analysis Report for {ticker}\n\n");
    report.push_str("| title | source | published | score |\n");
    report.push_str("|---|---|---|---|\n");
    for scored in items {
        report.push_str(&format!(
            "| {} | {} | {} | {:.1} |\n",
            table_cell(&scored.item.title),
            table_cell(&scored.item.source),
            table_cell(&scored.item.published_at),
            scored.score
        ));
    }
    report
}

fn table_cell(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
