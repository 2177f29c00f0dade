//! Inline button payloads
//!
//! Payloads travel as `action_argument` strings; they are decoded once here
//! and everything downstream matches on [`CallbackAction`].

use std::fmt;

const DOWNLOAD_PREFIX: &str = "download_";
const INFO_PREFIX: &str = "info_";

/// Telegram rejects inline buttons whose `callback_data` is longer.
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Download the quality with this format id from the user's session
    Download(String),
    /// Extended card for the session of this user
    ShowInfo(i64),
    Help,
    Settings,
    Stats,
    RequestNewLink,
}

impl CallbackAction {
    /// Decodes a payload; `None` for anything unrecognized.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "help" => return Some(CallbackAction::Help),
            "settings" => return Some(CallbackAction::Settings),
            "stats" => return Some(CallbackAction::Stats),
            "new" => return Some(CallbackAction::RequestNewLink),
            _ => {}
        }

        if let Some(id) = data.strip_prefix(DOWNLOAD_PREFIX) {
            return (!id.is_empty()).then(|| CallbackAction::Download(id.to_string()));
        }
        if let Some(user) = data.strip_prefix(INFO_PREFIX) {
            return user.parse().ok().map(CallbackAction::ShowInfo);
        }
        None
    }

    /// Payload string for an inline button.
    pub fn payload(&self) -> String {
        self.to_string()
    }

    pub fn fits_button(&self) -> bool {
        self.payload().len() <= MAX_CALLBACK_DATA_BYTES
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Download(id) => write!(f, "{}{}", DOWNLOAD_PREFIX, id),
            CallbackAction::ShowInfo(user) => write!(f, "{}{}", INFO_PREFIX, user),
            CallbackAction::Help => f.write_str("help"),
            CallbackAction::Settings => f.write_str("settings"),
            CallbackAction::Stats => f.write_str("stats"),
            CallbackAction::RequestNewLink => f.write_str("new"),
        }
    }
}
