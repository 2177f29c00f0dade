use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration constants for the bot
/// Everything is read once at first access; there is no hot reload.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid {}={:?}, using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Bot token
/// Read from TELEGRAM_TOKEN, BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("TELEGRAM_TOKEN")
        .or_else(|_| env::var("BOT_TOKEN"))
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Display name used in the welcome message
pub static BOT_NAME: Lazy<String> =
    Lazy::new(|| env::var("BOT_NAME").unwrap_or_else(|_| "Pinterest Downloader Bot".to_string()));

/// Verbose logging switch
/// Read from DEBUG_MODE ("true" enables debug level)
pub static DEBUG_MODE: Lazy<bool> = Lazy::new(|| {
    env::var("DEBUG_MODE")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Working directory root; holds videos/, thumbnails/, logs/ and cache/
/// Read from TEMP_DIR environment variable
/// Default: ./temp
pub static TEMP_DIR: Lazy<PathBuf> =
    Lazy::new(|| PathBuf::from(env::var("TEMP_DIR").unwrap_or_else(|_| "temp".to_string())));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: <TEMP_DIR>/logs/bot.log
pub static LOG_FILE_PATH: Lazy<PathBuf> = Lazy::new(|| {
    env::var("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| TEMP_DIR.join("logs").join("bot.log"))
});

/// Download limits
pub mod limits {
    use super::{env_parse, Lazy};

    /// Maximum file size Telegram accepts for bot video uploads (bytes)
    /// Read from MAX_FILE_SIZE, default 50 MB
    pub static MAX_FILE_SIZE: Lazy<u64> = Lazy::new(|| env_parse("MAX_FILE_SIZE", 50 * 1024 * 1024));

    /// Maximum video duration in seconds
    /// Read from MAX_VIDEO_DURATION, default 600 (10 minutes)
    pub static MAX_VIDEO_DURATION: Lazy<u64> = Lazy::new(|| env_parse("MAX_VIDEO_DURATION", 600));

    /// Number of quality buttons offered per video
    pub const MAX_QUALITY_OPTIONS: usize = 5;
}

/// Download configuration
pub mod download {
    use super::{env, Lazy};

    /// yt-dlp format selector used when fetching
    /// Read from DEFAULT_QUALITY, default caps at 1080p
    pub static DEFAULT_QUALITY: Lazy<String> =
        Lazy::new(|| env::var("DEFAULT_QUALITY").unwrap_or_else(|_| "best[height<=1080]/best".to_string()));

    /// Container yt-dlp merges into
    pub const DEFAULT_EXTENSION: &str = "mp4";

    /// Socket timeout passed to yt-dlp (in seconds)
    pub const SOCKET_TIMEOUT_SECS: u64 = 30;

    /// Retries passed to yt-dlp for both requests and fragments
    pub const RETRIES: u32 = 3;

    /// Browser-like User-Agent sent with every yt-dlp request
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Average throughput used for the download time estimate (bytes per second)
    pub const ESTIMATED_SPEED_BYTES_PER_SEC: u64 = 2 * 1024 * 1024;
}

/// Temp file retention configuration
pub mod retention {
    use super::{env_parse, Duration, Lazy};

    /// Maximum age of a temp file before the sweeper removes it (in hours)
    /// Read from TEMP_FILE_RETENTION_HOURS, default 1
    pub static RETENTION_HOURS: Lazy<u64> = Lazy::new(|| env_parse("TEMP_FILE_RETENTION_HOURS", 1));

    /// Delay between two sweeps (in seconds)
    /// Read from CLEANUP_INTERVAL_SECS, default 3600
    pub static SWEEP_INTERVAL_SECS: Lazy<u64> = Lazy::new(|| env_parse("CLEANUP_INTERVAL_SECS", 3600));

    /// Retention window duration
    pub fn max_age() -> Duration {
        Duration::from_secs(*RETENTION_HOURS * 3600)
    }

    /// Sweep interval duration
    pub fn interval() -> Duration {
        Duration::from_secs(*SWEEP_INTERVAL_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for a 50 MB video upload on a slow link
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_parse_falls_back_on_garbage() {
        std::env::set_var("PINCORE_TEST_PARSE", "not-a-number");
        assert_eq!(env_parse("PINCORE_TEST_PARSE", 7u64), 7);
        std::env::set_var("PINCORE_TEST_PARSE", " 42 ");
        assert_eq!(env_parse("PINCORE_TEST_PARSE", 7u64), 42);
        std::env::remove_var("PINCORE_TEST_PARSE");
        assert_eq!(env_parse("PINCORE_TEST_PARSE", 7u64), 7);
    }

    #[test]
    fn test_durations() {
        assert_eq!(network::timeout(), Duration::from_secs(300));
    }
}
