//! User-supplied trend lines drawn over the chart

use std::str::FromStr;

use chrono::NaiveDate;

/// A line overlaid on the price chart
#[derive(Debug, Clone, PartialEq)]
pub enum TrendLine {
    /// Support/resistance level spanning the whole chart
    Horizontal { price: f64 },
    /// Line between two (date, price) anchors
    Sloped {
        start: NaiveDate,
        start_price: f64,
        end: NaiveDate,
        end_price: f64,
    },
}

impl TrendLine {
    pub fn horizontal(price: f64) -> Result<Self, String> {
        validate_price(price)?;
        Ok(TrendLine::Horizontal { price })
    }

    pub fn sloped(
        start: NaiveDate,
        start_price: f64,
        end: NaiveDate,
        end_price: f64,
    ) -> Result<Self, String> {
        validate_price(start_price)?;
        validate_price(end_price)?;
        if start >= end {
            return Err(format!(
                "Trend line start {} must be before its end {}",
                start, end
            ));
        }
        Ok(TrendLine::Sloped {
            start,
            start_price,
            end,
            end_price,
        })
    }

    /// Price of the line at `date`.
    ///
    /// Sloped lines are interpolated in log space so they stay straight on a
    /// logarithmic price axis. Dates outside the anchors extrapolate.
    pub fn price_at(&self, date: NaiveDate) -> f64 {
        match *self {
            TrendLine::Horizontal { price } => price,
            TrendLine::Sloped {
                start,
                start_price,
                end,
                end_price,
            } => {
                let span = (end - start).num_days() as f64;
                let t = (date - start).num_days() as f64 / span;
                let (a, b) = (start_price.ln(), end_price.ln());
                (a + (b - a) * t).exp()
            }
        }
    }
}

fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price <= 0.0 {
        return Err(format!(
            "Trend line price must be a positive number, got {}",
            price
        ));
    }
    Ok(())
}

fn parse_anchor(anchor: &str) -> Result<(NaiveDate, f64), String> {
    let (date_str, price_str) = anchor
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("Invalid anchor '{}'. Use: YYYY-MM-DD:PRICE", anchor))?;

    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", date_str, e))?;
    let price = price_str
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid price '{}'", price_str))?;

    Ok((date, price))
}

/// Parses the `--aline` syntax: `YYYY-MM-DD:PRICE,YYYY-MM-DD:PRICE`
impl FromStr for TrendLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(
                "Invalid trend line. Use: START_DATE:PRICE,END_DATE:PRICE".to_string()
            );
        }

        let (start, start_price) = parse_anchor(parts[0])?;
        let (end, end_price) = parse_anchor(parts[1])?;
        TrendLine::sloped(start, start_price, end, end_price)
    }
}
