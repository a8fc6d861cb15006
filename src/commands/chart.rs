use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::Cli;
use crate::api::yahoo::YahooClient;
use crate::config::AppConfig;
use crate::models::{Candle, ChartOutcome, ChartRequest, DataSource, Timeframe, TrendLine};
use crate::services::{chart_service, history_service, resample_service, sample_service};
use crate::utils::{candle_table, extract_clean_error, St13Error};

/// Validate and normalize a ticker symbol
pub fn resolve_symbol(raw: &str) -> Result<String, St13Error> {
    let symbol = raw.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(St13Error::InvalidArgument(
            "Symbol cannot be empty".to_string(),
        ));
    }
    if symbol.chars().any(char::is_whitespace) {
        return Err(St13Error::InvalidArgument(format!(
            "Symbol cannot contain spaces: '{}'",
            raw
        )));
    }

    Ok(symbol)
}

/// `<dir>/<SYMBOL>_<timeframe>.png`, with path separators in the symbol replaced
pub fn default_output_path(dir: &Path, symbol: &str, timeframe: Timeframe) -> PathBuf {
    let file_symbol: String = symbol
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{}_{}.png", file_symbol, timeframe))
}

/// Horizontal lines from `--hline` followed by the `--aline` lines
pub fn build_trend_lines(
    hlines: &[f64],
    alines: Vec<TrendLine>,
) -> Result<Vec<TrendLine>, St13Error> {
    let mut lines = hlines
        .iter()
        .map(|price| TrendLine::horizontal(*price))
        .collect::<Result<Vec<_>, _>>()
        .map_err(St13Error::InvalidArgument)?;
    lines.extend(alines);
    Ok(lines)
}

fn synthetic_history(end: NaiveDate) -> Result<Vec<Candle>, St13Error> {
    let mut rng = rand::thread_rng();
    sample_service::generate_sample_data(&mut rng, sample_service::SampleParams::default(), end)
}

/// Download and clean the history, or fall back to sample data on provider failure
async fn daily_candles(
    config: &AppConfig,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    sample: bool,
) -> Result<(Vec<Candle>, DataSource), St13Error> {
    if sample {
        info!("Using generated sample data");
        return Ok((synthetic_history(end)?, DataSource::Synthetic));
    }

    let client = YahooClient::with_base_url(config.yahoo_base_url.clone(), config.http_timeout)?;
    debug!("Using data provider at {}", client.base_url());
    match history_service::load_history(&client, symbol, start, end).await {
        Ok(raw) => Ok((history_service::clean_bars(raw)?, DataSource::Provider)),
        Err(e) => {
            warn!(
                "Error downloading real data for {}: {}",
                symbol,
                extract_clean_error(&e.to_string())
            );
            warn!("Using generated sample data");
            Ok((synthetic_history(end)?, DataSource::Synthetic))
        }
    }
}

/// Fetch, resample and chart the price history of one symbol
pub async fn execute(cli: Cli, config: &AppConfig) -> Result<ChartOutcome, St13Error> {
    let symbol = resolve_symbol(&cli.symbol)?;
    let end = cli.end.unwrap_or_else(|| Utc::now().date_naive());
    let start = cli.start.unwrap_or(config.default_start);

    if start >= end {
        return Err(St13Error::InvalidArgument(format!(
            "Start date {} must be before end date {}",
            start, end
        )));
    }

    let trend_lines = build_trend_lines(&cli.hlines, cli.alines)?;
    info!(
        "Charting {} {} candles from {} to {} with {} trend line(s)",
        symbol,
        cli.timeframe,
        start,
        end,
        trend_lines.len()
    );

    let (daily, source) = daily_candles(config, &symbol, start, end, cli.sample).await?;
    let candles = resample_service::resample(&daily, cli.timeframe);

    let mut title = cli
        .title
        .unwrap_or_else(|| format!("{} Price History", symbol));
    if source == DataSource::Synthetic {
        title.push_str(" [sample data]");
    }

    let request = ChartRequest {
        title,
        timeframe: cli.timeframe,
        width: config.chart_width,
        height: config.chart_height,
        trend_lines,
    };

    let path = cli
        .output
        .unwrap_or_else(|| default_output_path(&config.output_dir, &symbol, cli.timeframe));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    chart_service::render_chart(&candles, &request, &path)?;

    if cli.summary > 0 {
        println!("{}", candle_table(&candles, cli.summary).render());
    }

    Ok(ChartOutcome {
        path,
        caption: request.caption(),
        candles: candles.len(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_symbol() {
        assert_eq!(resolve_symbol(" db ").unwrap(), "DB");
        assert_eq!(resolve_symbol("brk-b").unwrap(), "BRK-B");
        assert!(matches!(resolve_symbol("   "), Err(St13Error::InvalidArgument(_))));
        assert!(matches!(resolve_symbol("A PL"), Err(St13Error::InvalidArgument(_))));
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("charts"), "AAPL", Timeframe::Weekly);
        assert_eq!(path, PathBuf::from("charts/AAPL_weekly.png"));

        let path = default_output_path(Path::new("."), "BRK/B", Timeframe::Monthly);
        assert_eq!(path, PathBuf::from("./BRK_B_monthly.png"));
    }

    #[test]
    fn test_build_trend_lines() {
        let sloped: TrendLine = "2021-01-01:10,2021-06-01:20".parse().unwrap();
        let lines = build_trend_lines(&[100.0, 150.0], vec![sloped.clone()]).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TrendLine::Horizontal { price: 100.0 });
        assert_eq!(lines[2], sloped);

        assert!(matches!(
            build_trend_lines(&[0.0], Vec::new()),
            Err(St13Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_rejects_inverted_dates() {
        let cli = Cli::try_parse_from(["st13", "--start", "2024-05-01", "--end", "2024-01-01"])
            .unwrap();
        let result = execute(cli, &AppConfig::default()).await;
        assert!(matches!(result, Err(St13Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_execute_renders_sample_chart() {
        let dir = std::env::temp_dir().join(format!("st13_execute_{}", std::process::id()));
        let output = dir.join("nested").join("x.png");
        let _ = std::fs::remove_dir_all(&dir);

        let cli = Cli::try_parse_from([
            "st13",
            "--sample",
            "--summary",
            "0",
            "--end",
            "2025-06-13",
            "--hline",
            "60",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let outcome = execute(cli, &AppConfig::default()).await.unwrap();

        assert_eq!(outcome.path, output);
        assert_eq!(outcome.source, DataSource::Synthetic);
        assert_eq!(outcome.caption, "AAPL Price History [sample data] (Monthly)");
        // 500 days ending 2025-06-13 start on 2024-01-31: Jan 2024 ..= Jun 2025
        assert_eq!(outcome.candles, 18);

        let written = std::fs::metadata(&output).unwrap();
        assert!(written.is_file());
        assert!(written.len() > 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_sample_data() {
        let config = AppConfig {
            yahoo_base_url: "http://127.0.0.1:9".to_string(),
            http_timeout: std::time::Duration::from_secs(2),
            ..AppConfig::default()
        };
        let end = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let (candles, source) = daily_candles(&config, "AAPL", start, end, false)
            .await
            .unwrap();
        assert_eq!(source, DataSource::Synthetic);
        assert_eq!(candles.len(), 500);
        assert_eq!(candles.last().unwrap().date, end);
    }
}
