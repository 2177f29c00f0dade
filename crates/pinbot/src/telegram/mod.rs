//! Telegram bot integration and handlers

pub mod bot;
pub mod callback;
pub mod delivery;
pub mod handlers;
pub mod menu;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, BotSetupError, Command};
pub use callback::CallbackAction;
pub use delivery::TelegramDelivery;
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use teloxide::Bot;
