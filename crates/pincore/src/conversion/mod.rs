//! ffprobe/ffmpeg pass-through helpers.
//!
//! Used only to bring an oversized download under the Telegram upload limit.

pub mod video;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::download::error::DownloadError;

pub use video::FfmpegCompressor;

/// Errors that can occur during conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Shrinks a video file under a byte budget.
///
/// Returns the path of the file to send: `input` itself when it already fits,
/// otherwise a new sibling file. `input` is never deleted.
#[async_trait]
pub trait VideoCompressor: Send + Sync {
    async fn compress(&self, input: &Path, max_bytes: u64) -> Result<PathBuf, DownloadError>;
}

/// Check if ffmpeg is available
pub async fn check_ffmpeg() -> bool {
    tokio::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get video duration using ffprobe
pub async fn get_video_duration<P: AsRef<Path>>(path: P) -> ConversionResult<f64> {
    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path.as_ref())
        .output()
        .await?;

    if !output.status.success() {
        return Err(ConversionError::FfmpegError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(raw: &str) -> ConversionResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::FfmpegError(format!("Failed to parse duration: {:?}", raw.trim())))
}

/// Get file size in bytes
pub async fn get_file_size<P: AsRef<Path>>(path: P) -> ConversionResult<u64> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(metadata.len())
}
