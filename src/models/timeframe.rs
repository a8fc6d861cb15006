//! Candle timeframe

use std::fmt;
use std::str::FromStr;

/// Width of one candle on the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Timeframe {
    /// Suffix appended to the chart caption
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Daily => "",
            Timeframe::Weekly => " (Weekly)",
            Timeframe::Monthly => " (Monthly)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" | "1d" => Ok(Timeframe::Daily),
            "weekly" | "w" | "1w" => Ok(Timeframe::Weekly),
            "monthly" | "m" | "1m" => Ok(Timeframe::Monthly),
            other => Err(format!(
                "Unknown timeframe: '{}'. Supported: daily, weekly, monthly",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("WEEKLY".parse::<Timeframe>(), Ok(Timeframe::Weekly));
        assert_eq!(" m ".parse::<Timeframe>(), Ok(Timeframe::Monthly));
        assert_eq!("daily".parse::<Timeframe>(), Ok(Timeframe::Daily));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "hourly".parse::<Timeframe>().unwrap_err();
        assert!(err.contains("hourly"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Timeframe::Daily.label(), "");
        assert_eq!(Timeframe::Weekly.label(), " (Weekly)");
        assert_eq!(Timeframe::default(), Timeframe::Monthly);
        assert_eq!(Timeframe::Monthly.to_string(), "monthly");
    }
}
