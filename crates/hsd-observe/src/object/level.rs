use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LoggerError;

/// Validated `EnvFilter` expression, e.g. `"info"` or `"hsd_core=debug,info"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// Creates a new `LoggerLevel`, validating the expression.
    ///
    /// # Examples
    /// ```
    /// use hsd_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("hsd_core=trace,info").unwrap();
    /// assert_eq!(lvl.as_str(), "hsd_core=trace,info");
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the `EnvFilter` for the subscriber.
    pub fn to_env_filter(&self) -> EnvFilter {
        // Validated on construction.
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.trim().to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(LoggerLevel(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerLevel;

    #[test]
    fn accepts_plain_and_directive_levels() {
        for lvl in ["info", "warn", "trace", "hsd_core=trace,hsd_api=debug,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "{lvl}");
        }
    }

    #[test]
    fn rejects_unknown_level_names() {
        for lvl in ["hsd_core=loud", "a=trace,b=wat"] {
            assert!(lvl.parse::<LoggerLevel>().is_err(), "{lvl}");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let lvl: LoggerLevel = " debug ".parse().unwrap();
        assert_eq!(lvl.as_str(), "debug");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""warn""#).unwrap();
        assert_eq!(lvl.as_str(), "warn");
        assert!(serde_json::from_str::<LoggerLevel>(r#""x=nope""#).is_err());
    }
}
