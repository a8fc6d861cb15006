use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::RawBar;

/// Top-level body of the v8 chart endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ErrorResponse>,
}

/// One symbol's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

/// Column-oriented OHLCV arrays; the provider uses `null` for gaps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Error object embedded in the chart body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub description: Option<String>,
}

/// Comprehensive error type for provider operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 404 Not Found (unknown or delisted symbol)
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited. Retry after {}", describe_retry(.retry_after))]
    RateLimited { retry_after: Option<u64> },
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    /// Error object inside a successful response
    #[error("Provider Error ({0}): {1}")]
    ProviderError(String, String),
    /// The provider answered but had no bars for the range
    #[error("No price history returned for {0}")]
    EmptyHistory(String),
}

fn describe_retry(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!("{} s", secs),
        None => "an unknown delay".to_string(),
    }
}

/// Parse a chart response body into daily bars
///
/// Timestamps are shifted by the exchange's `gmtoffset` before taking the
/// calendar date, so a bar opening at 09:30 New York time is dated that day.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Vec<RawBar>, ApiError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

    if let Some(err) = envelope.chart.error {
        let description = err.description.unwrap_or_default();
        return Err(ApiError::ProviderError(err.code, description));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::EmptyHistory(symbol.to_string()))?;

    if result.timestamp.is_empty() {
        return Err(ApiError::EmptyHistory(symbol.to_string()));
    }

    let meta = &result.meta;
    debug!(
        "{} quoted in {} on {}",
        meta.symbol,
        meta.currency.as_deref().unwrap_or("unknown currency"),
        meta.exchange_timezone_name.as_deref().unwrap_or("an unknown exchange")
    );

    let offset = meta.gmtoffset;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| ApiError::DeserializationError(format!("Invalid timestamp: {}", ts)))?
            .date_naive();

        bars.push(RawBar {
            date,
            open: column(&quote.open, i),
            high: column(&quote.high, i),
            low: column(&quote.low, i),
            close: column(&quote.close, i),
            volume: column(&quote.volume, i),
        });
    }

    Ok(bars)
}
