use crate::core::config;

/// Sentinel shown when a size or duration is not known.
pub const UNKNOWN: &str = "Unknown";

/// Formats a byte count with 1024-based units and one decimal.
///
/// Zero and negative sizes yield [`UNKNOWN`]; extractors report 0 when they
/// could not determine a size.
///
/// # Example
///
/// ```
/// use pincore::core::utils::format_size;
///
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(0), "Unknown");
/// ```
pub fn format_size(bytes: i64) -> String {
    if bytes <= 0 {
        return UNKNOWN.to_string();
    }

    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// Formats a duration in seconds as `M:SS`, or `H:MM:SS` past one hour.
///
/// ```
/// use pincore::core::utils::format_duration;
///
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(3725), "1:02:05");
/// ```
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return UNKNOWN.to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Rough transfer time for a file of `bytes`, assuming an average connection.
pub fn estimate_download_time(bytes: i64) -> String {
    if bytes <= 0 {
        return UNKNOWN.to_string();
    }

    let seconds = bytes as u64 / config::download::ESTIMATED_SPEED_BYTES_PER_SEC;
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else {
        format!("{} hours", seconds / 3600)
    }
}

/// Keeps at most `max_chars` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Escapes special characters for Telegram MarkdownV2.
///
/// Backslash is escaped first so already-escaped input is not doubled up.
///
/// ```
/// use pincore::core::utils::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("Hello. World!"), "Hello\\. World\\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.'
            | '!' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Unique file name: `{prefix}_{unix_ts}_{8 hex chars}.{extension}`
pub fn unique_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", prefix, timestamp, &suffix[..8], extension)
}
