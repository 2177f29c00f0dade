//! Collaborator seams for metadata extraction and file fetching.
//!
//! The conversation flow only sees these traits, so tests can swap the
//! yt-dlp backend for in-memory doubles.
//!
//! Built-in backend:
//! - `YtDlpSource`: shells out to yt-dlp for both operations

pub mod ytdlp;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::download::error::DownloadError;
use crate::download::types::{DownloadResult, VideoInfo};

pub use ytdlp::YtDlpSource;

/// Parameters for one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Direct media URL, or a pin link when `format` names a format id
    pub url: String,
    /// Where the file should land; the backend may pick a sibling extension
    pub output_path: PathBuf,
    /// yt-dlp format selector; `None` means the configured default ceiling
    pub format: Option<String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_path: output_path.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Resolves a canonical link to video metadata.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// `Ok(None)` when the link resolves but carries no playable format.
    async fn extract(&self, url: &str) -> Result<Option<VideoInfo>, DownloadError>;
}

/// Materializes a media URL on disk.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// `Ok(None)` when the backend finished without producing a file.
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<DownloadResult>, DownloadError>;
}
