mod config;
mod error;
mod logger;
mod object;

pub use config::{ENV_LOG_COLOR, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_LOG_TZ, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Once initialized, all `tracing` macros (`info!`, `debug!`, etc.) will use this configuration.
///
/// # Important: Local Timezone
/// For `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before the
/// tokio runtime starts any threads.
///
/// # Examples
/// ```rust
/// use hsd_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("Failed to initialize logger");
///
/// tracing::info!("Logger initialized successfully");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => logger::logger_text(cfg),
        LoggerFormat::Json => logger::logger_json(cfg),
        LoggerFormat::Journald => logger::logger_journald(cfg),
    }
}
