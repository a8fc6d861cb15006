//! Data models for st13 commands and services
//!
//! This module organizes the bar, candle and chart structs passed between the
//! provider client, the services and the CLI command.

pub mod candle;
pub mod chart;
pub mod timeframe;
pub mod trendline;

// Re-export commonly used types for convenience
pub use candle::{Candle, RawBar};
pub use chart::{ChartOutcome, ChartRequest, DataSource};
pub use timeframe::Timeframe;
pub use trendline::TrendLine;
