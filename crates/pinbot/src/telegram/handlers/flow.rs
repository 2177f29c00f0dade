//! Link messages and inline button presses

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardMarkup, Message, MessageId, ParseMode, User};

use super::commands::{send_help, send_settings, send_stats};
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::callback::CallbackAction;
use crate::telegram::delivery::TelegramDelivery;
use crate::telegram::menu;
use pincore::conversation::Selection;
use pincore::core::utils::truncate_chars;
use pincore::{Conversation, FlowError};

fn user_id(user: &User) -> i64 {
    i64::try_from(user.id.0).unwrap_or_default()
}

fn display_name(user: &User) -> String {
    user.username.clone().unwrap_or_else(|| user.first_name.clone())
}

async fn edit(bot: &Bot, chat_id: ChatId, message_id: MessageId, text: String) -> Result<(), HandlerError> {
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

/// Classifies a link message. `Err` carries the rejection text.
pub(super) fn classify_link(conversation: &Conversation, uid: i64, text: &str) -> Result<String, String> {
    conversation.classify(uid, text).map_err(|e| {
        log::info!("user {}: rejected input {:?}", uid, truncate_chars(text, 100));
        menu::flow_error_text(&e)
    })
}

/// Extracts `url` and builds the text that replaces the status message,
/// with the quality buttons when a video was found.
pub(super) async fn analysis_reply(
    conversation: &Conversation,
    uid: i64,
    url: &str,
) -> (String, Option<InlineKeyboardMarkup>) {
    match conversation.analyze(uid, url).await {
        Ok(info) => (menu::video_found_text(&info), Some(menu::options_keyboard(&info, uid))),
        Err(e) => (menu::flow_error_text(&e), None),
    }
}

pub(super) fn select_quality(conversation: &Conversation, uid: i64, quality_id: &str) -> Result<Selection, String> {
    conversation.select(uid, quality_id).map_err(|e| menu::flow_error_text(&e))
}

pub(super) fn info_reply(conversation: &Conversation, uid: i64) -> String {
    match conversation.session(uid) {
        Some(info) => menu::info_text(&info),
        None => menu::flow_error_text(&FlowError::SessionExpired),
    }
}

/// Any non-command text: classify, extract and offer the quality buttons.
pub(super) async fn handle_link(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let text = msg.text().unwrap_or_default();
    let uid = user_id(user);

    // invalid links never get a status message
    let url = match classify_link(&deps.conversation, uid, text) {
        Ok(url) => url,
        Err(reply) => {
            bot.send_message(msg.chat.id, reply)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
            return Ok(());
        }
    };

    let status = bot
        .send_message(msg.chat.id, menu::analyzing_text())
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    let (reply, keyboard) = analysis_reply(&deps.conversation, uid, &url).await;
    let mut request = bot
        .edit_message_text(msg.chat.id, status.id, reply)
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(keyboard) = keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

/// Inline button presses. Unknown payloads are acknowledged and ignored.
pub(super) async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(action) = CallbackAction::parse(data) else {
        log::warn!("Ignoring unknown callback payload {:?}", data);
        return Ok(());
    };
    let Some((chat_id, message_id)) = q.message.as_ref().map(|m| (m.chat().id, m.id())) else {
        return Ok(());
    };
    let uid = user_id(&q.from);
    log::debug!("user {}: callback {}", uid, action);

    match action {
        CallbackAction::Download(quality_id) => {
            download(bot, chat_id, message_id, &q.from, &quality_id, deps).await?;
        }
        CallbackAction::ShowInfo(owner) => {
            if owner != uid {
                log::debug!("user {} opened info of user {}, showing their own session", uid, owner);
            }
            let text = info_reply(&deps.conversation, uid);
            bot.send_message(chat_id, text).parse_mode(ParseMode::MarkdownV2).await?;
        }
        CallbackAction::Help => send_help(bot, chat_id).await?,
        CallbackAction::Settings => send_settings(bot, chat_id, deps).await?,
        CallbackAction::Stats => send_stats(bot, chat_id, &q.from, deps).await?,
        CallbackAction::RequestNewLink => {
            bot.send_message(chat_id, menu::new_link_text())
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
    }
    Ok(())
}

async fn download(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    user: &User,
    quality_id: &str,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let uid = user_id(user);
    let selection = match select_quality(&deps.conversation, uid, quality_id) {
        Ok(selection) => selection,
        Err(reply) => return edit(bot, chat_id, message_id, reply).await,
    };

    // an edit without reply_markup removes the quality buttons
    edit(bot, chat_id, message_id, menu::downloading_text(&selection.quality)).await?;

    let delivery = TelegramDelivery::new(bot.clone(), chat_id);
    let text = match deps
        .conversation
        .download_and_deliver(uid, &display_name(user), &selection, &delivery)
        .await
    {
        Ok(_) => menu::delivered_text(),
        Err(e) => menu::flow_error_text(&e),
    };
    edit(bot, chat_id, message_id, text).await
}
