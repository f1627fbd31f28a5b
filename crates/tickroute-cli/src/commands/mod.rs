mod classify;
mod reports;
mod routes;

use tickroute_core::{ReportService, Settings, ValidationError};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Settings file and environment, with command-line flags applied last.
pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(gateway_url) = &cli.gateway_url {
        settings.gateway_url = Some(gateway_url.clone());
    }
    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }
    if let Some(log_format) = cli.log_format {
        settings.log_format = log_format.as_str().to_owned();
    }

    Ok(settings)
}

pub async fn run(cli: &Cli, settings: &Settings) -> Result<String, CliError> {
    match &cli.command {
        Command::Fundamentals(args) => {
            let service = ReportService::from_settings(settings);
            reports::fundamentals(args, &service).await
        }
        Command::News(args) => {
            let service = ReportService::from_settings(settings);
            reports::news(args, &service).await
        }
        Command::FilteredNews(args) => {
            let service = ReportService::from_settings(settings);
            reports::filtered_news(args, &service).await
        }
        Command::Classify(args) => classify::run(args),
        Command::Routes(args) => routes::run(args),
    }
}

fn require_ticker(raw: &str) -> Result<&str, ValidationError> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    Ok(ticker)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
