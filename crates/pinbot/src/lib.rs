//! pinbot - Telegram front end for the Pinterest downloader
//!
//! - `cli`: command line interface
//! - `telegram`: bot setup, dispatcher schema, texts and keyboards

pub mod cli;
pub mod telegram;
