//! Quality list construction from `yt-dlp -J` output.

use serde_json::Value;
use std::collections::HashMap;

use crate::core::config;
use crate::core::utils::{format_duration, format_size, truncate_chars};
use crate::download::types::{QualityOption, VideoInfo};

const DEFAULT_TITLE: &str = "Pinterest Video";
const DESCRIPTION_MAX_CHARS: usize = 300;

/// Maps a vertical resolution to a display label.
///
/// Below 144 lines the format id is consulted ("hd"/"sd"), then the raw
/// height, then "Unknown".
pub fn quality_label(height: u32, format_id: &str) -> String {
    let label = match height {
        h if h >= 2160 => "4K",
        h if h >= 1440 => "2K",
        h if h >= 1080 => "1080p",
        h if h >= 720 => "720p",
        h if h >= 480 => "480p",
        h if h >= 360 => "360p",
        h if h >= 240 => "240p",
        h if h >= 144 => "144p",
        _ => {
            let lowered = format_id.to_lowercase();
            if lowered.contains("hd") {
                "HD"
            } else if lowered.contains("sd") {
                "SD"
            } else if height > 0 {
                return format!("{}p", height);
            } else {
                "Unknown"
            }
        }
    };
    label.to_string()
}

fn as_i64(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn as_str<'a>(format: &'a Value, key: &str) -> Option<&'a str> {
    format.get(key).and_then(Value::as_str)
}

fn quality_from_format(format: &Value) -> Option<QualityOption> {
    let vcodec = as_str(format, "vcodec").unwrap_or("unknown");
    // audio-only
    if vcodec == "none" {
        return None;
    }

    let id = as_str(format, "format_id").unwrap_or_default().to_string();
    let height = as_i64(format.get("height")).unwrap_or(0).max(0) as u32;
    let width = as_i64(format.get("width")).unwrap_or(0).max(0) as u32;
    let filesize = as_i64(format.get("filesize"))
        .or_else(|| as_i64(format.get("filesize_approx")))
        .unwrap_or(0);
    let extension = match as_str(format, "ext") {
        None | Some("unknown_video") => config::download::DEFAULT_EXTENSION.to_string(),
        Some(ext) => ext.to_string(),
    };
    let acodec = as_str(format, "acodec").unwrap_or("none").to_string();

    Some(QualityOption {
        label: quality_label(height, &id),
        id,
        url: as_str(format, "url").unwrap_or_default().to_string(),
        height,
        width,
        fps: format.get("fps").and_then(Value::as_f64).unwrap_or(0.0),
        filesize,
        size: format_size(filesize),
        extension,
        has_audio: acodec != "none",
        vcodec: vcodec.to_string(),
        acodec,
    })
}

/// Builds the ordered quality list from the `formats` array.
///
/// One entry per label; a later format replaces an earlier one only when its
/// size is strictly greater. Sorted by descending height and capped at
/// [`config::limits::MAX_QUALITY_OPTIONS`].
pub fn extract_qualities(json: &Value) -> Vec<QualityOption> {
    let formats = match json.get("formats").and_then(Value::as_array) {
        Some(formats) => formats,
        None => return Vec::new(),
    };

    let mut by_quality: HashMap<String, QualityOption> = HashMap::new();
    for candidate in formats.iter().filter_map(quality_from_format) {
        match by_quality.get_mut(&candidate.label) {
            Some(existing) => {
                if candidate.filesize > existing.filesize {
                    *existing = candidate;
                }
            }
            None => {
                by_quality.insert(candidate.label.clone(), candidate);
            }
        }
    }

    let mut ordered: Vec<QualityOption> = by_quality.into_values().collect();
    ordered.sort_by(|a, b| b.height.cmp(&a.height).then_with(|| a.label.cmp(&b.label)));
    ordered.truncate(config::limits::MAX_QUALITY_OPTIONS);
    ordered
}

/// Turns the full extraction JSON into a [`VideoInfo`].
///
/// Returns `None` when no playable format survives, which callers treat
/// the same as an extraction failure.
pub fn video_info_from_json(json: &Value, url: &str) -> Option<VideoInfo> {
    let qualities = extract_qualities(json);
    let best = qualities.first()?.clone();

    let duration_secs = as_i64(json.get("duration")).unwrap_or(0);
    let resolution = if best.width > 0 {
        format!("{}x{}", best.width, best.height)
    } else {
        format!("{}p", best.height)
    };

    Some(VideoInfo {
        title: as_str(json, "title").unwrap_or(DEFAULT_TITLE).to_string(),
        duration: format_duration(duration_secs),
        duration_secs,
        best_quality: best.label.clone(),
        best_size: best.size.clone(),
        resolution,
        has_audio: best.has_audio,
        format: best.extension.to_uppercase(),
        uploader: as_str(json, "uploader").unwrap_or("Unknown").to_string(),
        description: truncate_chars(as_str(json, "description").unwrap_or_default(), DESCRIPTION_MAX_CHARS),
        view_count: json.get("view_count").and_then(Value::as_u64).unwrap_or(0),
        like_count: json.get("like_count").and_then(Value::as_u64).unwrap_or(0),
        url: url.to_string(),
        webpage_url: as_str(json, "webpage_url").unwrap_or(url).to_string(),
        thumbnail: as_str(json, "thumbnail").map(str::to_string),
        qualities,
    })
}
