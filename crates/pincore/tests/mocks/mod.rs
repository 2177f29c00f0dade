//! In-memory collaborators for flow tests
//!
//! Stand-ins for yt-dlp and the Telegram upload so the conversation flow can
//! run without network or external binaries.

pub mod collaborators;

pub use collaborators::{sample_info, MockCompressor, MockDelivery, MockExtractor, MockFetcher, RotatingSessionStore};
