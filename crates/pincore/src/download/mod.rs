//! Extraction and fetch collaborators
//!
//! - `source`: the `MediaExtractor`/`MediaFetcher` seams and the yt-dlp backend
//! - `formats`: turns yt-dlp JSON into a ranked quality list
//! - `error`/`ytdlp_errors`: failure types and best-effort stderr hints

pub mod error;
pub mod formats;
pub mod source;
pub mod types;
pub mod ytdlp_errors;

pub use error::DownloadError;
pub use source::{FetchRequest, MediaExtractor, MediaFetcher};
pub use types::{DownloadResult, QualityOption, VideoInfo};
