//! Age-based temp file cleanup.
//!
//! The sweeper scans each configured directory non-recursively and deletes
//! regular files whose modification time is older than the retention window.
//! It runs as a supervised background task started at init and stopped
//! through a [`CancellationToken`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::config;

/// Counters from one pass over the directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Regular files looked at
    pub scanned: usize,
    pub removed: usize,
    /// Files that were old enough but could not be inspected or deleted
    pub failed: usize,
}

impl SweepReport {
    fn merge(&mut self, other: SweepReport) {
        self.scanned += other.scanned;
        self.removed += other.removed;
        self.failed += other.failed;
    }
}

/// Deletes a single file right away. A missing file is not an error; any
/// other failure is logged and the file is left for the periodic sweep.
pub fn remove_file(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            log::warn!("Failed to delete {}: {}", path.display(), e);
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    dirs: Vec<PathBuf>,
    max_age: Duration,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(dirs: Vec<PathBuf>, max_age: Duration, interval: Duration) -> Self {
        Self {
            dirs,
            max_age,
            interval,
        }
    }

    /// Sweeper over `dirs` using the configured retention window and interval.
    pub fn from_config(dirs: Vec<PathBuf>) -> Self {
        Self::new(dirs, config::retention::max_age(), config::retention::interval())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// One pass over every directory, measured against the current time.
    pub fn sweep_once(&self) -> SweepReport {
        self.sweep_at(SystemTime::now())
    }

    /// One pass with an explicit notion of "now".
    pub fn sweep_at(&self, now: SystemTime) -> SweepReport {
        let mut report = SweepReport::default();
        for dir in &self.dirs {
            report.merge(self.sweep_dir(dir, now));
        }
        report
    }

    fn sweep_dir(&self, dir: &Path, now: SystemTime) -> SweepReport {
        let mut report = SweepReport::default();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return report,
            Err(e) => {
                log::warn!("Cannot scan {}: {}", dir.display(), e);
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Cannot read entry in {}: {}", dir.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            let path = entry.path();

            // symlinks are followed; directories never removed
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("Cannot stat {}: {}", path.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            report.scanned += 1;

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    log::warn!("No mtime for {}: {}", path.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            // mtime in the future counts as fresh
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= self.max_age {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::debug!("Swept {} (age {}s)", path.display(), age.as_secs());
                    report.removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    log::warn!("Failed to sweep {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Starts the periodic sweep. The first pass runs immediately; the task
    /// exits once `cancel_token` is cancelled.
    pub fn spawn(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            log::info!(
                "Retention sweeper started (every {}s, max age {}s, {} dirs)",
                self.interval.as_secs(),
                self.max_age.as_secs(),
                self.dirs.len()
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let sweeper = self.clone();
                        let report = match tokio::task::spawn_blocking(move || sweeper.sweep_once()).await {
                            Ok(report) => report,
                            Err(e) => {
                                log::error!("Retention sweep panicked: {}", e);
                                continue;
                            }
                        };
                        if report.removed > 0 || report.failed > 0 {
                            log::info!(
                                "Retention sweep: scanned {}, removed {}, failed {}",
                                report.scanned,
                                report.removed,
                                report.failed
                            );
                        }
                    }
                    _ = cancel_token.cancelled() => {
                        log::info!("Retention sweeper stopped");
                        break;
                    }
                }
            }
        })
    }
}
