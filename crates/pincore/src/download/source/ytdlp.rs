//! YtDlpSource: extraction and fetch through the yt-dlp binary.
//!
//! Extraction runs `yt-dlp -J` and hands the JSON to `formats`; fetch runs a
//! real download with `--no-simulate -j` so the same call also reports the
//! resolved title, duration and dimensions.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

use crate::core::config;
use crate::download::error::DownloadError;
use crate::download::formats::video_info_from_json;
use crate::download::source::{FetchRequest, MediaExtractor, MediaFetcher};
use crate::download::types::{DownloadResult, VideoInfo};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, last_error_line};

/// Extension tried when yt-dlp ignores the requested container.
const FALLBACK_EXTENSION: &str = "webm";

#[derive(Debug, Clone)]
pub struct YtDlpSource {
    bin: String,
}

impl YtDlpSource {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: &[String]) -> Result<Output, DownloadError> {
        log::debug!("yt-dlp command: {} {}", self.bin, args.join(" "));
        Command::new(&self.bin)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DownloadError::Process(format!("Failed to execute {}: {}", self.bin, e)))
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new(config::YTDL_BIN.as_str())
    }
}

/// Flags shared by every invocation.
fn common_args() -> Vec<String> {
    vec![
        "--no-warnings".to_string(),
        "--no-playlist".to_string(),
        "--no-check-certificates".to_string(),
        "--socket-timeout".to_string(),
        config::download::SOCKET_TIMEOUT_SECS.to_string(),
        "--user-agent".to_string(),
        config::download::USER_AGENT.to_string(),
    ]
}

pub(crate) fn extract_args(url: &str) -> Vec<String> {
    let mut args = common_args();
    args.push("-J".to_string());
    args.push(url.to_string());
    args
}

pub(crate) fn fetch_args(request: &FetchRequest) -> Vec<String> {
    let format = request
        .format
        .clone()
        .unwrap_or_else(|| config::download::DEFAULT_QUALITY.clone());
    let retries = config::download::RETRIES.to_string();

    let mut args = common_args();
    args.extend([
        "-f".to_string(),
        format,
        "--merge-output-format".to_string(),
        config::download::DEFAULT_EXTENSION.to_string(),
        "--retries".to_string(),
        retries.clone(),
        "--fragment-retries".to_string(),
        retries,
        "--skip-unavailable-fragments".to_string(),
        "-o".to_string(),
        request.output_path.display().to_string(),
        "--no-simulate".to_string(),
        "-j".to_string(),
        request.url.clone(),
    ]);
    args
}

/// Turns a failed run into an error, logging the best-effort category.
fn failure(output: &Output) -> DownloadError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let hint = analyze_ytdlp_error(&stderr);
    let line = last_error_line(&stderr).unwrap_or("yt-dlp exited without output");
    log::warn!("yt-dlp failed ({:?}, exit {:?}): {}", hint, output.status.code(), line);
    DownloadError::YtDlp(line.to_string())
}

/// Last JSON object printed on stdout (yt-dlp prints one line per video).
fn parse_json_stdout(stdout: &[u8]) -> Result<Value, DownloadError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| DownloadError::YtDlp("yt-dlp printed no metadata".to_string()))?;
    serde_json::from_str(line).map_err(|e| DownloadError::YtDlp(format!("Unparsable yt-dlp metadata: {}", e)))
}

/// The requested path, or its `.webm` sibling, whichever exists.
pub(crate) async fn resolve_output_path(requested: &Path) -> Option<PathBuf> {
    if tokio::fs::try_exists(requested).await.unwrap_or(false) {
        return Some(requested.to_path_buf());
    }
    let fallback = requested.with_extension(FALLBACK_EXTENSION);
    if tokio::fs::try_exists(&fallback).await.unwrap_or(false) {
        log::debug!("Using {} fallback: {}", FALLBACK_EXTENSION, fallback.display());
        return Some(fallback);
    }
    None
}

fn download_result_from_json(json: &Value, path: PathBuf, size: u64) -> DownloadResult {
    let dimension = |key: &str| json.get(key).and_then(Value::as_u64).unwrap_or(0);
    DownloadResult {
        path,
        size,
        title: json.get("title").and_then(Value::as_str).unwrap_or("video").to_string(),
        duration_secs: json
            .get("duration")
            .and_then(Value::as_f64)
            .map(|d| d as i64)
            .unwrap_or(0),
        resolution: format!("{}x{}", dimension("width"), dimension("height")),
        format: json
            .get("ext")
            .and_then(Value::as_str)
            .unwrap_or(config::download::DEFAULT_EXTENSION)
            .to_string(),
        success: true,
    }
}

#[async_trait]
impl MediaExtractor for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<Option<VideoInfo>, DownloadError> {
        let output = self.run(&extract_args(url)).await?;
        if !output.status.success() {
            return Err(failure(&output));
        }

        let json = parse_json_stdout(&output.stdout)?;
        let info = video_info_from_json(&json, url);
        match &info {
            Some(info) => log::info!(
                "Extracted '{}' from {}: {} qualities, best {}",
                info.title,
                url,
                info.qualities.len(),
                info.best_quality
            ),
            None => log::info!("No playable formats for {}", url),
        }
        Ok(info)
    }
}

#[async_trait]
impl MediaFetcher for YtDlpSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<DownloadResult>, DownloadError> {
        if let Some(parent) = request.output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::Other(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let output = self.run(&fetch_args(request)).await?;
        if !output.status.success() {
            return Err(failure(&output));
        }

        let Some(path) = resolve_output_path(&request.output_path).await else {
            log::warn!("yt-dlp succeeded but {} is missing", request.output_path.display());
            return Ok(None);
        };
        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|e| DownloadError::FileNotFound(format!("{}: {}", path.display(), e)))?
            .len();

        let json = parse_json_stdout(&output.stdout).unwrap_or(Value::Null);
        let result = download_result_from_json(&json, path, size);
        log::info!("Fetched {} ({} bytes)", result.path.display(), result.size);
        Ok(Some(result))
    }
}
