use std::fmt;

/// Structured error type for extraction and fetch operations.
#[derive(Debug)]
pub enum DownloadError {
    /// yt-dlp specific failures (binary not found, bad exit code, unparsable output)
    YtDlp(String),
    /// FFmpeg/ffprobe failures (compression, probing)
    Ffmpeg(String),
    /// Expected file not found after yt-dlp reported success
    FileNotFound(String),
    /// Video longer than the configured limit
    TooLong { duration_secs: u64, limit_secs: u64 },
    /// File larger than Telegram accepts, even after compression
    TooLarge { size_bytes: u64, limit_bytes: u64 },
    /// Process execution failure (spawn)
    Process(String),
    /// Catch-all for uncategorized errors
    Other(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::YtDlp(msg)
            | DownloadError::Ffmpeg(msg)
            | DownloadError::FileNotFound(msg)
            | DownloadError::Process(msg)
            | DownloadError::Other(msg) => write!(f, "{}", msg),
            DownloadError::TooLong {
                duration_secs,
                limit_secs,
            } => write!(f, "Video is too long: {}s > {}s", duration_secs, limit_secs),
            DownloadError::TooLarge {
                size_bytes,
                limit_bytes,
            } => write!(f, "File is too large: {} bytes > {} bytes", size_bytes, limit_bytes),
        }
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Returns subcategory for log lines
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::YtDlp(_) => "ytdlp",
            DownloadError::Ffmpeg(_) => "ffmpeg",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::TooLong { .. } => "too_long",
            DownloadError::TooLarge { .. } => "too_large",
            DownloadError::Process(_) => "process",
            DownloadError::Other(_) => "other",
        }
    }
}
