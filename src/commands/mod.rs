pub mod chart;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::models::{Timeframe, TrendLine};

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "st13", version)]
#[command(about = "Log-scale candlestick charts with trend lines")]
pub struct Cli {
    /// Ticker symbol as listed on Yahoo Finance
    #[arg(default_value = "AAPL")]
    pub symbol: String,

    /// Candle width: daily, weekly or monthly
    #[arg(short, long, default_value = "monthly")]
    pub timeframe: Timeframe,

    /// First day of history (YYYY-MM-DD), defaults to ST13_DEFAULT_START
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of history (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// PNG file to write, defaults to <ST13_OUTPUT_DIR>/<SYMBOL>_<timeframe>.png
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chart title, defaults to "<SYMBOL> Price History"
    #[arg(long)]
    pub title: Option<String>,

    /// Chart generated sample data instead of downloading prices
    #[arg(long)]
    pub sample: bool,

    /// Horizontal trend line at PRICE (repeatable)
    #[arg(long = "hline", value_name = "PRICE")]
    pub hlines: Vec<f64>,

    /// Sloped trend line between two anchors (repeatable)
    #[arg(long = "aline", value_name = "START:PRICE,END:PRICE")]
    pub alines: Vec<TrendLine>,

    /// Number of most recent candles to print after charting
    #[arg(long, default_value_t = 5)]
    pub summary: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["st13"]).unwrap();
        assert_eq!(cli.symbol, "AAPL");
        assert_eq!(cli.timeframe, Timeframe::Monthly);
        assert!(cli.start.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.sample);
        assert!(cli.hlines.is_empty());
        assert_eq!(cli.summary, 5);
    }

    #[test]
    fn test_symbol_and_options() {
        let cli = Cli::try_parse_from([
            "st13",
            "msft",
            "--timeframe",
            "weekly",
            "--start",
            "2021-03-01",
            "--hline",
            "250",
            "--hline",
            "300.5",
            "--aline",
            "2021-03-01:200,2022-03-01:320",
            "--sample",
        ])
        .unwrap();

        assert_eq!(cli.symbol, "msft");
        assert_eq!(cli.timeframe, Timeframe::Weekly);
        assert_eq!(cli.start, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(cli.hlines, vec![250.0, 300.5]);
        assert_eq!(cli.alines.len(), 1);
        assert!(cli.sample);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["st13", "--timeframe", "hourly"]).is_err());
        assert!(Cli::try_parse_from(["st13", "--start", "yesterday"]).is_err());
        assert!(Cli::try_parse_from(["st13", "--aline", "2021-01-01:5"]).is_err());
        assert!(Cli::try_parse_from(["st13", "AAPL", "MSFT"]).is_err());
    }
}
