use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::error::{LoggerError, LoggerResult};
use crate::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_TZ: &str = "LOG_TZ";
pub const ENV_LOG_COLOR: &str = "LOG_COLOR";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Log level filter expression (e.g., "info", "hsd_core=debug,info").
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Build the config from `LOG_FORMAT`, `LOG_LEVEL`, `LOG_TZ` and `LOG_COLOR`.
    ///
    /// `lookup` returns the raw value of a variable; empty values count as unset
    /// and keep the default. `RUST_LOG` is used when `LOG_LEVEL` is unset.
    ///
    /// # Examples
    /// ```rust
    /// use hsd_observe::{LoggerConfig, LoggerFormat};
    ///
    /// let cfg = LoggerConfig::from_lookup(|name| match name {
    ///     "LOG_FORMAT" => Some("json".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(cfg.format, LoggerFormat::Json);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(ENV_LOG_FORMAT) {
            cfg.format = v.parse()?;
        }
        if let Some(v) = get(ENV_LOG_LEVEL).or_else(|| get("RUST_LOG")) {
            cfg.level = v.parse()?;
        }
        if let Some(v) = get(ENV_LOG_TZ) {
            cfg.tz = v.parse()?;
        }
        if let Some(v) = get(ENV_LOG_COLOR) {
            cfg.use_color = parse_flag(ENV_LOG_COLOR, &v)?;
        }
        Ok(cfg)
    }

    /// Same as [`LoggerConfig::from_lookup`] over the process environment.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Color is enabled only if `use_color` is set AND stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

fn parse_flag(name: &'static str, value: &str) -> LoggerResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
