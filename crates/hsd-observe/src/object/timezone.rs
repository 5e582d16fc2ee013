use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicI32, Ordering},
};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::error::LoggerError;

/// Offset used for timestamps, in seconds east of UTC.
static OFFSET_SECONDS: AtomicI32 = AtomicI32::new(0);

/// Timezone configuration for log timestamps.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    /// UTC timezone (default).
    #[default]
    Utc,
    /// Local system timezone, detected by [`init_local_offset`].
    Local,
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Detects the local UTC offset and uses it for log timestamps.
///
/// **Call in `main()` before the tokio runtime is built.** Offset detection
/// fails once the process is multi-threaded on most Unix platforms; in that
/// case timestamps stay in UTC.
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OFFSET_SECONDS.store(offset.whole_seconds(), Ordering::Relaxed);
}

/// Offset applied to timestamps right now.
pub(crate) fn current_offset() -> UtcOffset {
    UtcOffset::from_whole_seconds(OFFSET_SECONDS.load(Ordering::Relaxed)).unwrap_or(UtcOffset::UTC)
}

/// Reset timestamps to UTC.
pub(crate) fn use_utc() {
    OFFSET_SECONDS.store(0, Ordering::Relaxed);
}
