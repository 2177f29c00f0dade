//! Message texts and inline keyboards
//!
//! Every text is MarkdownV2: static fragments go through `escape` like
//! dynamic ones, bold spans are built with `bold`.

use pincore::core::utils::{escape_markdown_v2 as escape, estimate_download_time, format_size, UNKNOWN};
use pincore::conversation::{FlowError, Limits};
use pincore::storage::{DownloadStats, UserStats};
use pincore::{QualityOption, VideoInfo};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::callback::{CallbackAction, MAX_CALLBACK_DATA_BYTES};

fn bold(text: &str) -> String {
    format!("*{}*", escape(text))
}

fn button(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.payload())
}

pub fn welcome_text(first_name: &str, bot_name: &str) -> String {
    [
        format!("🎬 {} 🎬", bold(bot_name)),
        String::new(),
        format!("Hello {}\\! 👋", bold(first_name)),
        String::new(),
        escape("I download videos from Pinterest for you."),
        String::new(),
        bold("How it works:"),
        escape("1. 📱 Find a video on Pinterest"),
        escape("2. 🔗 Copy the link"),
        escape("3. 📤 Send it to me"),
        escape("4. ⬇️ Pick a quality and get the video"),
        String::new(),
        bold("Accepted links:"),
        escape("• https://pinterest.com/pin/123456789/"),
        escape("• https://pin.it/abc123"),
        String::new(),
        escape("Send me a link to get started!"),
    ]
    .join("\n")
}

pub fn welcome_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("❓ Help", CallbackAction::Help),
            button("⚙️ Settings", CallbackAction::Settings),
        ],
        vec![button("📊 Stats", CallbackAction::Stats)],
    ])
}

pub fn help_text() -> String {
    [
        bold("❓ HELP"),
        String::new(),
        bold("How to use:"),
        escape("1. Copy a Pinterest video link"),
        escape("2. Send it to the bot"),
        escape("3. Choose a quality"),
        escape("4. Receive the video"),
        String::new(),
        bold("Common problems:"),
        format!("• {}: {}", bold("Link not recognized"), escape("make sure it is a Pinterest link")),
        format!("• {}: {}", bold("Download failed"), escape("try again or pick another quality")),
        format!("• {}: {}", bold("Video too large"), escape("pick a lower quality")),
        String::new(),
        bold("Commands:"),
        escape("/start - Start the bot"),
        escape("/help - Show this help"),
    ]
    .join("\n")
}

pub fn settings_text(limits: Limits, default_quality: &str) -> String {
    [
        bold("⚙️ SETTINGS"),
        String::new(),
        format!("{} {}", bold("Quality ceiling:"), escape(default_quality)),
        format!("{} MP4", bold("Format:")),
        format!(
            "{} {}",
            bold("Max size:"),
            escape(&format!("{} (Telegram limit)", format_size(limits.max_file_size as i64)))
        ),
        format!(
            "{} {}",
            bold("Max duration:"),
            escape(&format!("{} min", limits.max_duration_secs / 60))
        ),
        String::new(),
        escape("Oversized videos are compressed automatically."),
    ]
    .join("\n")
}

pub fn stats_text(first_name: &str, user: &UserStats, global: &DownloadStats, limits: Limits) -> String {
    let last = user
        .last
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Never".to_string());
    [
        bold("📊 STATISTICS"),
        String::new(),
        format!("{} {}", bold("User:"), escape(first_name)),
        format!("{} {}", bold("Downloads:"), user.downloads),
        format!("{} {}", bold("Last:"), escape(&last)),
        String::new(),
        bold("Bot:"),
        escape(&format!(
            "• {} downloads ({} ok, {} failed), {} today",
            global.total, global.successful, global.failed, global.today
        )),
        escape(&format!("• {} delivered in total", format_size(global.total_size as i64))),
        String::new(),
        bold("Limits:"),
        escape(&format!("• Size: {} max", format_size(limits.max_file_size as i64))),
        escape("• No daily limit"),
    ]
    .join("\n")
}

pub fn invalid_link_text() -> String {
    [
        bold("❌ Invalid link"),
        String::new(),
        escape("Please send a valid Pinterest link:"),
        escape("• https://pinterest.com/pin/..."),
        escape("• https://pin.it/..."),
        String::new(),
        escape("Use /help for more info."),
    ]
    .join("\n")
}

pub fn analyzing_text() -> String {
    bold("🔍 Analyzing...")
}

pub fn new_link_text() -> String {
    bold("📤 Send a new Pinterest link")
}

pub fn video_found_text(info: &VideoInfo) -> String {
    [
        bold("🎬 Video found!"),
        String::new(),
        format!("{} {}", bold("Title:"), escape(&info.title)),
        format!("{} {}", bold("Duration:"), escape(&info.duration)),
        String::new(),
        escape("Choose a quality:"),
    ]
    .join("\n")
}

/// One row per quality, then a row with "another link" and "info".
/// Qualities whose payload would not fit a button are left out.
pub fn options_keyboard(info: &VideoInfo, user_id: i64) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = info
        .qualities
        .iter()
        .filter_map(|q| {
            let action = CallbackAction::Download(q.id.clone());
            if !action.fits_button() {
                log::warn!(
                    "Skipping quality {:?}: callback data exceeds {} bytes",
                    q.id,
                    MAX_CALLBACK_DATA_BYTES
                );
                return None;
            }
            Some(vec![button(format!("⬇️ {} ({})", q.label, q.size), action)])
        })
        .collect();
    rows.push(vec![
        button("🔄 Another link", CallbackAction::RequestNewLink),
        button("📊 Info", CallbackAction::ShowInfo(user_id)),
    ]);
    InlineKeyboardMarkup::new(rows)
}

pub fn info_text(info: &VideoInfo) -> String {
    let audio = if info.has_audio { "Yes" } else { "No" };
    let mut lines = vec![
        bold("📊 Video details"),
        String::new(),
        format!("{} {}", bold("Title:"), escape(&info.title)),
        format!("{} {}", bold("Duration:"), escape(&info.duration)),
        format!("{} {}", bold("Best quality:"), escape(&info.best_quality)),
        format!("{} {}", bold("Size:"), escape(&info.best_size)),
        format!("{} {}", bold("Resolution:"), escape(&info.resolution)),
        format!("{} {}", bold("Audio:"), audio),
        format!("{} {}", bold("Format:"), escape(&info.format)),
        format!("{} {}", bold("Uploader:"), escape(&info.uploader)),
    ];
    if info.view_count > 0 {
        lines.push(format!("{} {}", bold("Views:"), info.view_count));
    }
    if !info.description.is_empty() {
        lines.push(String::new());
        lines.push(format!("_{}_", escape(&info.description)));
    }
    lines.join("\n")
}

pub fn downloading_text(quality: &QualityOption) -> String {
    let mut lines = vec![bold(&format!("📥 Downloading {}...", quality.label))];
    if quality.filesize > 0 {
        lines.push(escape(&format!(
            "⏱ About {} for {}",
            estimate_download_time(quality.filesize),
            quality.size
        )));
    }
    lines.push(escape("Please wait."));
    lines.join("\n")
}

pub fn delivered_text() -> String {
    bold("✅ Video sent!")
}

/// User-facing text for a failed interaction.
pub fn flow_error_text(err: &FlowError) -> String {
    match err {
        FlowError::InvalidInput => invalid_link_text(),
        FlowError::ExtractionUnavailable => [
            bold("❌ Video not found"),
            String::new(),
            escape("Possible reasons:"),
            escape("• Private video"),
            escape("• Expired link"),
            escape("• Network problem"),
            String::new(),
            escape("Try another link."),
        ]
        .join("\n"),
        FlowError::SessionExpired => escape("❌ Session expired. Send the link again."),
        FlowError::QualityNotFound(_) => escape("❌ Quality not available. Send the link again."),
        FlowError::FetchFailure(_) | FlowError::DeliveryFailure(_) => {
            let detail = err.detail().unwrap_or_else(|| UNKNOWN.to_string());
            escape(&format!("❌ Error: {}", detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use teloxide::types::InlineKeyboardButtonKind;

    fn info() -> VideoInfo {
        VideoInfo {
            title: "Cat (funny).mp4".to_string(),
            duration: "0:42".to_string(),
            qualities: vec![
                QualityOption {
                    id: "V_720P".to_string(),
                    label: "720p".to_string(),
                    size: "2.0 MB".to_string(),
                    ..Default::default()
                },
                QualityOption {
                    id: "V_360P".to_string(),
                    label: "360p".to_string(),
                    size: "Unknown".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn payloads(markup: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
        markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| match &b.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => format!("{:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_options_keyboard_layout() {
        let markup = options_keyboard(&info(), 77);
        assert_eq!(
            payloads(&markup),
            vec![
                vec!["download_V_720P".to_string()],
                vec!["download_V_360P".to_string()],
                vec!["new".to_string(), "info_77".to_string()],
            ]
        );
        assert_eq!(markup.inline_keyboard[0][0].text, "⬇️ 720p (2.0 MB)");
    }

    #[test]
    fn test_options_keyboard_skips_oversized_payloads() {
        let mut info = info();
        // "download_" plus 55 bytes is exactly the limit
        info.qualities[0].id = "a".repeat(55);
        info.qualities[1].id = "b".repeat(56);

        let rows = payloads(&options_keyboard(&info, 77));

        assert_eq!(
            rows,
            vec![
                vec![format!("download_{}", "a".repeat(55))],
                vec!["new".to_string(), "info_77".to_string()],
            ]
        );
        assert!(rows.iter().flatten().all(|p| p.len() <= MAX_CALLBACK_DATA_BYTES));
    }

    #[test]
    fn test_welcome_keyboard_payloads() {
        assert_eq!(
            payloads(&welcome_keyboard()),
            vec![
                vec!["help".to_string(), "settings".to_string()],
                vec!["stats".to_string()],
            ]
        );
    }

    #[test]
    fn test_dynamic_text_is_escaped() {
        let text = video_found_text(&info());
        assert!(text.contains("Cat \\(funny\\)\\.mp4"));
        assert!(text.starts_with("*🎬 Video found\\!*"));
    }

    #[test]
    fn test_fetch_error_text_is_truncated() {
        let err = FlowError::FetchFailure("x".repeat(300));
        let text = flow_error_text(&err);
        assert_eq!(text, format!("❌ Error: {}", "x".repeat(100)));
    }

    #[test]
    fn test_downloading_text_estimate() {
        let info = info();
        assert_eq!(downloading_text(&info.qualities[1]), "*📥 Downloading 360p\\.\\.\\.*\nPlease wait\\.");

        let sized = QualityOption {
            label: "720p".to_string(),
            filesize: 10 * 1024 * 1024,
            size: "10.0 MB".to_string(),
            ..Default::default()
        };
        assert!(downloading_text(&sized).contains("About 5 seconds for 10\\.0 MB"));
    }

    #[test]
    fn test_session_errors_ask_for_link() {
        assert!(flow_error_text(&FlowError::SessionExpired).contains("Send the link again"));
        assert!(flow_error_text(&FlowError::QualityNotFound("1".into())).contains("not available"));
    }
}
