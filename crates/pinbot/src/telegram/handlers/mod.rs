//! Telegram bot handler tree configuration

mod commands;
mod flow;
mod schema;
#[cfg(test)]
mod test_support;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
