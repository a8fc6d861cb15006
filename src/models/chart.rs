//! Chart generation models

use std::path::PathBuf;

use super::{Timeframe, TrendLine};

/// Everything the renderer needs besides the candles themselves
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub title: String,
    pub timeframe: Timeframe,
    pub width: u32,
    pub height: u32,
    pub trend_lines: Vec<TrendLine>,
}

impl ChartRequest {
    /// Caption drawn above the plot, e.g. "AAPL Price History (Weekly)"
    pub fn caption(&self) -> String {
        format!("{}{}", self.title, self.timeframe.label())
    }
}

/// Where the charted prices came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Provider,
    Synthetic,
}

/// Result of a chart command
#[derive(Debug)]
pub struct ChartOutcome {
    pub path: PathBuf,
    /// Caption drawn on the chart
    pub caption: String,
    pub candles: usize,
    pub source: DataSource,
}
