//! Runtime configuration read from the environment (and `.env`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;

use crate::api::yahoo::YahooClient;
use crate::utils::St13Error;

const MIN_CHART_SIDE: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub default_start: NaiveDate,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            chart_width: 1400,
            chart_height: 800,
            default_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            yahoo_base_url: YahooClient::DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, St13Error> {
    raw.trim()
        .parse()
        .map_err(|_| St13Error::Config(format!("{} has an invalid value: '{}'", name, raw)))
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, St13Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, St13Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("ST13_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("ST13_CHART_WIDTH") {
            config.chart_width = parse_var("ST13_CHART_WIDTH", &raw)?;
        }
        if let Some(raw) = lookup("ST13_CHART_HEIGHT") {
            config.chart_height = parse_var("ST13_CHART_HEIGHT", &raw)?;
        }
        if let Some(raw) = lookup("ST13_DEFAULT_START") {
            config.default_start = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                St13Error::Config(format!("ST13_DEFAULT_START has an invalid value: '{}' ({})", raw, e))
            })?;
        }
        if let Some(url) = lookup("ST13_YAHOO_BASE_URL") {
            config.yahoo_base_url = url;
        }
        if let Some(raw) = lookup("ST13_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse_var("ST13_HTTP_TIMEOUT_SECS", &raw)?);
        }

        if config.chart_width < MIN_CHART_SIDE || config.chart_height < MIN_CHART_SIDE {
            return Err(St13Error::Config(format!(
                "Chart must be at least {}x{} pixels, got {}x{}",
                MIN_CHART_SIDE, MIN_CHART_SIDE, config.chart_width, config.chart_height
            )));
        }

        Ok(config)
    }
}
