//! Command handler implementations (/start, /help) and the static menu screens

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode, User};

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::menu;
use pincore::config;
use pincore::storage::StatsReport;

fn first_name(user: Option<&User>) -> String {
    user.map(|u| u.first_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let name = first_name(msg.from.as_ref());
    log::info!("/start from chat {}", msg.chat.id);

    bot.send_message(msg.chat.id, menu::welcome_text(&name, &deps.bot_name))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(menu::welcome_keyboard())
        .await?;
    Ok(())
}

/// Handle /help command and the "help" button
pub(super) async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<(), HandlerError> {
    bot.send_message(chat_id, menu::help_text())
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

pub(super) async fn send_settings(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let text = menu::settings_text(deps.conversation.limits(), &config::download::DEFAULT_QUALITY);
    bot.send_message(chat_id, text).parse_mode(ParseMode::MarkdownV2).await?;
    Ok(())
}

pub(super) async fn send_stats(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let user_id = i64::try_from(user.id.0).unwrap_or_default();
    let report = load_report(deps, user_id).await;
    let text = menu::stats_text(
        &first_name(Some(user)),
        &report.user,
        &report.global,
        deps.conversation.limits(),
    );
    bot.send_message(chat_id, text).parse_mode(ParseMode::MarkdownV2).await?;
    Ok(())
}

/// Reads the download logs once, off the async workers.
pub(super) async fn load_report(deps: &HandlerDeps, user_id: i64) -> StatsReport {
    let Some(history) = deps.conversation.history().cloned() else {
        return StatsReport::default();
    };
    match tokio::task::spawn_blocking(move || history.report(user_id)).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("Stats task failed: {}", e);
            StatsReport::default()
        }
    }
}
