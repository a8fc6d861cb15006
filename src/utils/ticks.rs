//! Price-axis helpers for logarithmic charts

use crate::models::Candle;

/// Mantissas of the "round" price levels
const TICK_BASES: [f64; 3] = [1.0, 2.0, 5.0];
/// Decades covered, from 0.01 to 50 000
const TICK_EXPONENTS: std::ops::RangeInclusive<i32> = -2..=4;
/// Extra levels that read well on stock charts
const INTERMEDIATE_TICKS: [f64; 11] = [
    1.5, 3.0, 6.0, 7.0, 15.0, 30.0, 70.0, 150.0, 300.0, 700.0, 1500.0,
];
const MAX_TICKS: usize = 10;

/// Pick tick positions for a log price axis spanning `[ymin, ymax]`
///
/// Returns round levels (1, 2, 5 per decade plus a few intermediates), thinned
/// to roughly eight when there are more than ten.
pub fn log_axis_ticks(ymin: f64, ymax: f64) -> Vec<f64> {
    let mut ticks: Vec<f64> = TICK_EXPONENTS
        .flat_map(|exp| TICK_BASES.iter().map(move |base| base * 10f64.powi(exp)))
        .chain(INTERMEDIATE_TICKS.iter().copied())
        .filter(|tick| *tick >= ymin && *tick <= ymax)
        .collect();

    ticks.sort_by(|a, b| a.total_cmp(b));
    ticks.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON * b.abs());

    if ticks.len() > MAX_TICKS {
        let step = ticks.len() / 8;
        ticks = ticks.into_iter().step_by(step).collect();
    }

    ticks
}

/// Format a price tick label: `1K`, `250`, `0.05`
pub fn format_price_label(price: f64) -> String {
    if price >= 1000.0 {
        format!("{:.0}K", price / 1000.0)
    } else if price >= 1.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Visible price range: 10% below the lowest low, 10% above the highest high
pub fn price_range(candles: &[Candle]) -> Option<(f64, f64)> {
    if candles.is_empty() {
        return None;
    }

    let min_low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let max_high = candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);

    Some((min_low * 0.9, max_high * 1.1))
}
