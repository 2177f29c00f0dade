//! pincore - engine behind the Pinterest downloader bot
//!
//! Everything here is transport-agnostic: the Telegram layer lives in the
//! `pinbot` crate and only talks to this crate through [`Conversation`].
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, formatting helpers, link classification
//! - `storage`: per-user sessions, working directory layout, retention sweeper, download log
//! - `download`: yt-dlp backed extraction/fetch collaborators and quality list building
//! - `conversion`: ffprobe/ffmpeg pass-through helpers
//! - `conversation`: the session/selection flow that ties it all together

pub mod conversation;
pub mod conversion;
pub mod core;
pub mod download;
pub mod storage;

// Re-export commonly used types for convenience
pub use conversation::{Conversation, FlowError, FlowState};
pub use core::{config, AppError};
pub use download::{DownloadResult, QualityOption, VideoInfo};
pub use storage::{InMemorySessionStore, RetentionSweeper, SessionStore};
