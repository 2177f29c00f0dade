//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command list registration in the Telegram UI

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;
use thiserror::Error;

use pincore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show help")]
    Help,
}

#[derive(Error, Debug)]
pub enum BotSetupError {
    #[error("no bot token: set TELEGRAM_TOKEN, BOT_TOKEN or TELOXIDE_TOKEN")]
    MissingToken,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Creates a Bot instance from the configured token
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(BotSetupError)` - No token configured or the HTTP client could not be built
pub fn create_bot() -> Result<Bot, BotSetupError> {
    let token = config::BOT_TOKEN.trim();
    if token.is_empty() {
        return Err(BotSetupError::MissingToken);
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "start the bot"),
        BotCommand::new("help", "show help"),
    ])
    .await?;

    Ok(())
}
