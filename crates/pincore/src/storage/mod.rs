//! Sessions, working directory layout, retention, download history

pub mod download_log;
pub mod retention;
pub mod session;

use std::path::{Path, PathBuf};

use crate::core::error::AppResult;

pub use download_log::{DownloadLog, DownloadLogEntry, DownloadStats, StatsReport, UserStats};
pub use retention::{remove_file, RetentionSweeper, SweepReport};
pub use session::{InMemorySessionStore, SelectError, SessionStore};

/// Layout of the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDirs {
    pub root: PathBuf,
    pub videos: PathBuf,
    pub thumbnails: PathBuf,
    pub logs: PathBuf,
    pub cache: PathBuf,
}

impl WorkDirs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            videos: root.join("videos"),
            thumbnails: root.join("thumbnails"),
            logs: root.join("logs"),
            cache: root.join("cache"),
            root,
        }
    }

    /// Creates every directory of the layout.
    pub fn ensure(&self) -> AppResult<()> {
        for dir in [&self.root, &self.videos, &self.thumbnails, &self.logs, &self.cache] {
            std::fs::create_dir_all(dir)?;
        }
        log::debug!("Working directory ready at {}", self.root.display());
        Ok(())
    }

    /// Directories whose files are temporary (everything except `logs/`).
    pub fn sweepable(&self) -> Vec<PathBuf> {
        vec![self.videos.clone(), self.thumbnails.clone(), self.cache.clone()]
    }
}
