use std::{fmt, net::SocketAddr, time::Duration};

use thiserror::Error;

use hsd_core::DEFAULT_UPSTREAM_TIMEOUT;
use hsd_observe::{LoggerConfig, LoggerError};

pub const ENV_API_URL: &str = "HEADSCALE_API_URL";
pub const ENV_API_KEY: &str = "HEADSCALE_API_KEY";
pub const ENV_LISTEN_ADDR: &str = "LISTEN_ADDR";
pub const ENV_METRICS_LISTEN_ADDR: &str = "METRICS_LISTEN_ADDR";
pub const ENV_UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("env {0} is not set")]
    Missing(&'static str),

    #[error("env {name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Logger(#[from] LoggerError),
}

/// Process configuration, read once at startup and immutable afterwards.
#[derive(Clone)]
pub struct DaemonConfig {
    /// Inventory API base URL, without trailing slash.
    pub api_url: String,
    /// Bearer credential for the inventory API.
    pub api_key: String,
    pub listen_addr: SocketAddr,
    /// `/metrics` listener; disabled when unset.
    pub metrics_addr: Option<SocketAddr>,
    pub upstream_timeout: Duration,
    pub logger: LoggerConfig,
}

impl DaemonConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let api_url = parse_base_url(&require(ENV_API_URL)?)?;
        let api_key = require(ENV_API_KEY)?;

        let listen_addr = parse_addr(
            ENV_LISTEN_ADDR,
            &get(ENV_LISTEN_ADDR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        )?;
        let metrics_addr = get(ENV_METRICS_LISTEN_ADDR)
            .map(|v| parse_addr(ENV_METRICS_LISTEN_ADDR, &v))
            .transpose()?;

        let upstream_timeout = match get(ENV_UPSTREAM_TIMEOUT_MS) {
            Some(v) => parse_timeout(&v)?,
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        let logger = LoggerConfig::from_lookup(&lookup)?;

        Ok(Self {
            api_url,
            api_key,
            listen_addr,
            metrics_addr,
            upstream_timeout,
            logger,
        })
    }
}

impl fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("listen_addr", &self.listen_addr)
            .field("metrics_addr", &self.metrics_addr)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("logger", &self.logger)
            .finish()
    }
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(value).map_err(|e| invalid(ENV_API_URL, value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        other => Err(invalid(ENV_API_URL, value, format!("unsupported scheme {other}"))),
    }
}

/// Accepts `host:port` and the `:port` shorthand for all interfaces.
fn parse_addr(name: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    let full = match value.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => value.to_string(),
    };
    full.parse().map_err(|e| invalid(name, value, e))
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) => Err(invalid(ENV_UPSTREAM_TIMEOUT_MS, value, "must be positive")),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(e) => Err(invalid(ENV_UPSTREAM_TIMEOUT_MS, value, e)),
    }
}
