use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One concrete rendition of a pin's video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityOption {
    /// yt-dlp format identifier, unique within one [`VideoInfo`]
    pub id: String,
    /// Human label ("1080p", "4K", "HD", ...)
    pub label: String,
    /// Direct media URL
    pub url: String,
    pub height: u32,
    pub width: u32,
    pub fps: f64,
    /// Reported size in bytes, 0 when unknown
    pub filesize: i64,
    /// `filesize` formatted for display
    pub size: String,
    pub extension: String,
    pub has_audio: bool,
    pub vcodec: String,
    pub acodec: String,
}

/// Metadata resolved for one link.
///
/// Built once per successful extraction and never mutated afterwards; the
/// session store hands out shared references to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    /// Formatted duration ("2:05"), "Unknown" when not reported
    pub duration: String,
    pub duration_secs: i64,
    /// At most five entries, highest resolution first
    pub qualities: Vec<QualityOption>,
    pub best_quality: String,
    pub best_size: String,
    /// "WxH" or "{h}p" of the best quality
    pub resolution: String,
    pub has_audio: bool,
    /// Container of the best quality, upper-case ("MP4")
    pub format: String,
    pub uploader: String,
    /// First 300 characters of the pin description
    pub description: String,
    pub view_count: u64,
    pub like_count: u64,
    /// Canonical link the metadata was resolved from
    pub url: String,
    pub webpage_url: String,
    pub thumbnail: Option<String>,
}

impl VideoInfo {
    /// Linear scan for the quality with the given id.
    pub fn quality(&self, id: &str) -> Option<&QualityOption> {
        self.qualities.iter().find(|q| q.id == id)
    }
}

/// Outcome of a fetch. The file at `path` is owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub size: u64,
    pub title: String,
    pub duration_secs: i64,
    /// "WxH" as reported by the fetcher, "0x0" when unknown
    pub resolution: String,
    pub format: String,
    pub success: bool,
}
