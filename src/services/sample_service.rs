use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::models::Candle;
use crate::utils::St13Error;

/// Mean daily return of the synthetic random walk
const DRIFT: f64 = 0.001;
/// Spread of the intraday wicks around the close
const WICK_VOLATILITY: f64 = 0.01;
const MIN_VOLUME: u64 = 1_000_000;
const MAX_VOLUME: u64 = 5_000_000;

/// Parameters of the fallback series charted when no real data is available
#[derive(Debug, Clone, Copy)]
pub struct SampleParams {
    pub start_price: f64,
    pub days: usize,
    pub volatility: f64,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            start_price: 50.0,
            days: 500,
            volatility: 0.03,
        }
    }
}

/// Generate daily OHLCV candles from a drifting random walk
///
/// Closes follow `p[i] = p[i-1] * (1 + r)` with `r ~ N(0.001, volatility)`.
/// Each candle opens at the previous close and gets wicks of about 1%. The
/// last candle is dated `end`, earlier ones on the preceding calendar days.
pub fn generate_sample_data<R: Rng>(
    rng: &mut R,
    params: SampleParams,
    end: NaiveDate,
) -> Result<Vec<Candle>, St13Error> {
    let SampleParams {
        start_price,
        days,
        volatility,
    } = params;

    if days == 0 {
        return Err(St13Error::InvalidArgument(
            "Sample data needs at least one day".to_string(),
        ));
    }
    if !start_price.is_finite() || start_price <= 0.0 {
        return Err(St13Error::InvalidArgument(format!(
            "Sample start price must be positive, got {}",
            start_price
        )));
    }

    let returns = Normal::new(DRIFT, volatility).map_err(|e| {
        St13Error::InvalidArgument(format!("Invalid sample volatility {}: {}", volatility, e))
    })?;
    let wicks = Normal::new(0.0, WICK_VOLATILITY)
        .map_err(|e| St13Error::InvalidArgument(e.to_string()))?;

    let first_date = end - Duration::days(days as i64 - 1);
    let mut candles = Vec::with_capacity(days);
    let mut previous = start_price;

    for i in 0..days {
        let price = if i == 0 {
            start_price
        } else {
            previous * (1.0 + returns.sample(rng))
        };

        let open = previous;
        let close = price;
        let high = (price * (1.0 + wicks.sample(rng).abs())).max(open).max(close);
        let low = (price * (1.0 - wicks.sample(rng).abs())).min(open).min(close);
        let volume = rng.gen_range(MIN_VOLUME..MAX_VOLUME) as f64;

        candles.push(Candle {
            date: first_date + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
        previous = price;
    }

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()
    }

    #[test]
    fn test_sample_shape() {
        let mut rng = StdRng::seed_from_u64(13);
        let candles = generate_sample_data(&mut rng, SampleParams::default(), end()).unwrap();

        assert_eq!(candles.len(), 500);
        assert_eq!(candles[0].open, 50.0);
        assert_eq!(candles[0].close, 50.0);
        assert_eq!(candles.last().unwrap().date, end());
        assert_eq!(candles[0].date, end() - Duration::days(499));

        for pair in candles.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
            assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }
        for c in &candles {
            assert!(c.low <= c.open.min(c.close));
            assert!(c.high >= c.open.max(c.close));
            assert!(c.low > 0.0);
            assert!((1_000_000.0..5_000_000.0).contains(&c.volume));
        }
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let params = SampleParams {
            start_price: 100.0,
            days: 30,
            volatility: 0.02,
        };
        let a = generate_sample_data(&mut StdRng::seed_from_u64(7), params, end()).unwrap();
        let b = generate_sample_data(&mut StdRng::seed_from_u64(7), params, end()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_rejects_bad_params() {
        let mut rng = StdRng::seed_from_u64(1);
        let zero_days = SampleParams { days: 0, ..SampleParams::default() };
        assert!(generate_sample_data(&mut rng, zero_days, end()).is_err());

        let bad_price = SampleParams { start_price: -5.0, ..SampleParams::default() };
        assert!(generate_sample_data(&mut rng, bad_price, end()).is_err());

        let bad_vol = SampleParams { volatility: -0.1, ..SampleParams::default() };
        assert!(generate_sample_data(&mut rng, bad_vol, end()).is_err());
    }
}
