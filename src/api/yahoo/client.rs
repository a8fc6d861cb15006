use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client as HttpClient, Url};
use tracing::{debug, warn};

use super::models::{parse_chart_response, ApiError, ChartEnvelope};
use crate::models::RawBar;

/// Yahoo Finance chart API client for downloading daily price history
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    /// The chart endpoint rejects requests without a browser-like agent
    const USER_AGENT_VALUE: &'static str =
        "Mozilla/5.0 (X11; Linux x86_64) st13/0.3 (+https://github.com/street13capital/st13)";

    /// Create a new client against `base_url` (the public endpoint, a mirror or a test server)
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .default_headers(Self::create_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create default headers
    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::USER_AGENT_VALUE));
        headers
    }

    /// Build the chart URL for a daily history request
    ///
    /// `end` is inclusive, so the request runs to the midnight after it. The
    /// symbol is percent-encoded as a single path segment.
    pub fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Url, ApiError> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::RequestError(format!("Invalid base URL '{}': {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::RequestError(format!("Base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(symbol);

        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history")
            .append_pair("includeAdjustedClose", "true");

        Ok(url)
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body_text = response.text().await.unwrap_or_default();

        // The provider usually wraps failures in the same chart envelope
        let message = serde_json::from_str::<ChartEnvelope>(&body_text)
            .ok()
            .and_then(|env| env.chart.error)
            .and_then(|err| err.description)
            .unwrap_or(body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            429 => {
                warn!("Rate limited by data provider, retry after {:?} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    /// GET /v8/finance/chart/{symbol}
    ///
    /// Retrieves daily OHLCV bars for a symbol between two dates.
    ///
    /// # Arguments
    /// * `symbol` - Ticker symbol as listed by the provider (e.g. `AAPL`)
    /// * `start` - First date of the history (inclusive)
    /// * `end` - Last date of the history (inclusive)
    ///
    /// # Returns
    /// * `Ok(Vec<RawBar>)` - Daily bars, possibly with missing fields
    /// * `Err(ApiError)` - Error with detailed error type
    pub async fn get_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, ApiError> {
        let url = self.chart_url(symbol, start, end)?;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read response: {}", e)))?;

        let bars = parse_chart_response(symbol, &body)?;
        debug!("Received {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}
