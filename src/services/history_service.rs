use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::yahoo::{ApiError, YahooClient};
use crate::models::{Candle, RawBar};
use crate::utils::St13Error;

/// Download daily bars for a symbol
pub async fn load_history(
    client: &YahooClient,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RawBar>, ApiError> {
    info!("Downloading {} daily history from {} to {}", symbol, start, end);
    let bars = client.get_daily_history(symbol, start, end).await?;

    if bars.is_empty() {
        return Err(ApiError::EmptyHistory(symbol.to_string()));
    }

    Ok(bars)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Turn provider bars into complete candles
///
/// Rows missing any of open/high/low/close are dropped. Missing volume counts
/// as zero. The result is sorted by date with one candle per date (the last
/// bar seen for a date wins).
pub fn clean_bars(raw: Vec<RawBar>) -> Result<Vec<Candle>, St13Error> {
    let total = raw.len();
    let mut by_date: BTreeMap<NaiveDate, Candle> = BTreeMap::new();

    for bar in raw {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            finite(bar.open),
            finite(bar.high),
            finite(bar.low),
            finite(bar.close),
        ) else {
            debug!("Dropping incomplete bar on {}", bar.date);
            continue;
        };

        by_date.insert(
            bar.date,
            Candle {
                date: bar.date,
                open,
                // keep the wicks around the body
                high: high.max(open).max(close),
                low: low.min(open).min(close),
                close,
                volume: finite(bar.volume).unwrap_or(0.0),
            },
        );
    }

    if by_date.is_empty() {
        return Err(St13Error::NoValidData);
    }

    let candles: Vec<Candle> = by_date.into_values().collect();
    if candles.len() < total {
        info!("Cleaned history: kept {} of {} bars", candles.len(), total);
    }

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, ohlc: [Option<f64>; 4], volume: Option<f64>) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2023, 5, day).unwrap(),
            open: ohlc[0],
            high: ohlc[1],
            low: ohlc[2],
            close: ohlc[3],
            volume,
        }
    }

    #[test]
    fn test_clean_drops_incomplete_rows() {
        let raw = vec![
            bar(1, [Some(10.0), Some(11.0), Some(9.0), Some(10.5)], Some(100.0)),
            bar(2, [None, Some(11.0), Some(9.0), Some(10.5)], Some(100.0)),
            bar(3, [Some(10.0), Some(f64::NAN), Some(9.0), Some(10.5)], None),
            bar(4, [Some(10.5), Some(12.0), Some(10.0), Some(11.5)], None),
        ];

        let candles = clean_bars(raw).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date.to_string(), "2023-05-01");
        assert_eq!(candles[1].date.to_string(), "2023-05-04");
        assert_eq!(candles[1].volume, 0.0);
    }

    #[test]
    fn test_clean_sorts_and_collapses_duplicates() {
        let raw = vec![
            bar(3, [Some(3.0), Some(3.0), Some(3.0), Some(3.0)], None),
            bar(1, [Some(1.0), Some(1.0), Some(1.0), Some(1.0)], None),
            bar(3, [Some(4.0), Some(4.0), Some(4.0), Some(4.0)], None),
        ];

        let candles = clean_bars(raw).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, 1.0);
        assert_eq!(candles[1].close, 4.0);
    }

    #[test]
    fn test_clean_widens_wicks() {
        let raw = vec![bar(1, [Some(10.0), Some(9.5), Some(9.8), Some(9.0)], None)];
        let candle = &clean_bars(raw).unwrap()[0];
        assert_eq!(candle.high, 10.0);
        assert_eq!(candle.low, 9.0);
    }

    #[test]
    fn test_clean_everything_invalid() {
        let raw = vec![bar(1, [None, None, None, None], Some(5.0))];
        assert!(matches!(clean_bars(raw), Err(St13Error::NoValidData)));
        assert!(matches!(clean_bars(Vec::new()), Err(St13Error::NoValidData)));
    }
}
