//! Handler types and dependencies

use std::sync::Arc;

use pincore::Conversation;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub conversation: Arc<Conversation>,
    pub bot_name: String,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(conversation: Arc<Conversation>, bot_name: impl Into<String>) -> Self {
        Self {
            conversation,
            bot_name: bot_name.into(),
        }
    }
}
