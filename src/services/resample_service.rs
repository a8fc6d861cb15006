use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::models::{Candle, Timeframe};

/// Friday ending the week that contains `date` (weekends roll forward)
pub fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let days_to_friday = (4 - weekday).rem_euclid(7);
    date + Duration::days(days_to_friday)
}

/// Last calendar day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Aggregate candles into wider buckets
///
/// Each bucket takes the first open, highest high, lowest low, last close and
/// summed volume of its members and is dated by the bucket's closing day
/// (Friday for weekly, month end for monthly). Input must be sorted by date.
pub fn resample(candles: &[Candle], timeframe: Timeframe) -> Vec<Candle> {
    let bucket_of: fn(NaiveDate) -> NaiveDate = match timeframe {
        Timeframe::Daily => return candles.to_vec(),
        Timeframe::Weekly => week_ending_friday,
        Timeframe::Monthly => month_end,
    };

    let mut buckets: Vec<Candle> = Vec::new();
    for candle in candles {
        let label = bucket_of(candle.date);
        match buckets.last_mut() {
            Some(current) if current.date == label => {
                current.high = current.high.max(candle.high);
                current.low = current.low.min(candle.low);
                current.close = candle.close;
                current.volume += candle.volume;
            }
            _ => buckets.push(Candle {
                date: label,
                ..candle.clone()
            }),
        }
    }

    debug!(
        "Resampled {} candles into {} {} candles",
        candles.len(),
        buckets.len(),
        timeframe
    );
    buckets
}
