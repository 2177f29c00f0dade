use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::{get_file_size, get_video_duration, ConversionError, ConversionResult, VideoCompressor};
use crate::download::error::DownloadError;

/// Audio track bitrate reserved out of the size budget (bits per second).
pub const AUDIO_BITRATE_BPS: u64 = 128_000;

/// Video bitrate that makes a `duration_secs` clip fit in `max_bytes`.
///
/// `None` when the duration is unknown or the audio track alone already
/// exhausts the budget.
pub fn target_video_bitrate(max_bytes: u64, duration_secs: f64) -> Option<u64> {
    if duration_secs <= 0.0 {
        return None;
    }
    let total = (max_bytes as f64 * 8.0 / duration_secs) as u64;
    total.checked_sub(AUDIO_BITRATE_BPS).filter(|bitrate| *bitrate > 0)
}

/// Sibling path `<stem>_compressed.mp4` next to `input`.
pub fn compressed_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    input.with_file_name(format!("{}_compressed.mp4", stem))
}

/// Re-encodes `input` with libx264/aac so it fits in `max_bytes`.
///
/// Returns `input` itself when it is already small enough. The source file is
/// left in place; the caller decides when to delete it.
pub async fn compress_to_size<P: AsRef<Path>>(input_path: P, max_bytes: u64) -> ConversionResult<PathBuf> {
    let input = input_path.as_ref();

    if !input.exists() {
        return Err(ConversionError::InputNotFound(input.display().to_string()));
    }

    let size = get_file_size(input).await?;
    if size <= max_bytes {
        return Ok(input.to_path_buf());
    }

    let duration = get_video_duration(input).await?;
    let bitrate = target_video_bitrate(max_bytes, duration).ok_or_else(|| {
        ConversionError::InvalidInput(format!(
            "Cannot fit {:.0}s of video into {} bytes",
            duration, max_bytes
        ))
    })?;

    let output_path = compressed_output_path(input);
    log::info!(
        "Compressing {} ({} bytes, {:.1}s) at {} bps",
        input.display(),
        size,
        duration,
        bitrate
    );

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
        .arg(input)
        .args([
            "-c:v",
            "libx264",
            "-b:v",
            &bitrate.to_string(),
            "-preset",
            "fast",
            "-c:a",
            "aac",
            "-b:a",
            "128k",
            "-movflags",
            "+faststart",
        ])
        .arg(&output_path)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::error!("FFmpeg compression error: {}", stderr);
        return Err(ConversionError::FfmpegError(stderr.to_string()));
    }

    Ok(output_path)
}

/// [`VideoCompressor`] backed by the system ffmpeg/ffprobe.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegCompressor;

#[async_trait]
impl VideoCompressor for FfmpegCompressor {
    async fn compress(&self, input: &Path, max_bytes: u64) -> Result<PathBuf, DownloadError> {
        compress_to_size(input, max_bytes)
            .await
            .map_err(|e| DownloadError::Ffmpeg(e.to_string()))
    }
}
