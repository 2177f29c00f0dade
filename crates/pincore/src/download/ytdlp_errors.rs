/// yt-dlp stderr analysis
///
/// yt-dlp has no structured error channel, so this is keyword matching on
/// stderr. The result feeds log lines only: users always get the generic
/// "possible reasons" message because the guess is not reliable enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Pin is private, deleted, or region locked
    VideoUnavailable,
    /// Shortened link that no longer resolves
    ExpiredLink,
    /// Timeouts, DNS, refused connections
    NetworkError,
    /// Pin exists but carries no video stream
    NoVideo,
    Unknown,
}

/// Guesses the failure category from yt-dlp stderr.
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("has been removed")
        || stderr_lower.contains("http error 403")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("http error 404") || stderr_lower.contains("not found") {
        return YtDlpErrorType::ExpiredLink;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("name resolution")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    if stderr_lower.contains("no video formats found") || stderr_lower.contains("unsupported url") {
        return YtDlpErrorType::NoVideo;
    }

    YtDlpErrorType::Unknown
}

/// Extracts the last `ERROR:` line from yt-dlp stderr, falling back to the
/// last non-empty line.
pub fn last_error_line(stderr: &str) -> Option<&str> {
    let mut lines = stderr.lines().map(str::trim).filter(|l| !l.is_empty());
    let all: Vec<&str> = lines.by_ref().collect();
    all.iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| all.last())
        .copied()
}
