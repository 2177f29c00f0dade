//! Download history as JSON lines.
//!
//! One file per day (`downloads_YYYY-MM-DD.log`) in the logs directory, one
//! JSON object per attempt. Stats are recomputed from the files on demand.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::utils::{format_duration, format_size, truncate_chars};

const FILE_PREFIX: &str = "downloads_";
const FILE_SUFFIX: &str = ".log";
const URL_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLogEntry {
    pub timestamp: DateTime<Local>,
    pub user_id: i64,
    pub username: String,
    /// First 100 characters of the link
    pub url: String,
    pub success: bool,
    pub file_size: u64,
    /// Video duration in seconds
    pub duration: i64,
    pub size_formatted: String,
    pub duration_formatted: String,
}

impl DownloadLogEntry {
    pub fn new(user_id: i64, username: &str, url: &str, success: bool, file_size: u64, duration: i64) -> Self {
        Self {
            timestamp: Local::now(),
            user_id,
            username: username.to_string(),
            url: truncate_chars(url, URL_MAX_CHARS),
            success,
            file_size,
            duration,
            size_formatted: format_size(file_size as i64),
            duration_formatted: format_duration(duration),
        }
    }
}

/// Aggregates over every daily file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub total_size: u64,
    pub today: u64,
}

/// Per-user slice of the history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub downloads: u64,
    pub last: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
pub struct DownloadLog {
    dir: PathBuf,
}

impl DownloadLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", FILE_PREFIX, date.format("%Y-%m-%d"), FILE_SUFFIX))
    }

    /// Appends one entry to the file of the entry's day.
    pub fn record(&self, entry: &DownloadLogEntry) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_for(entry.timestamp.date_naive());
        let mut file = File::options().create(true).append(true).open(&path)?;
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        writeln!(file, "{}", line)
    }

    /// Every parseable entry across all daily files. Unreadable files and
    /// malformed lines are skipped.
    fn entries(&self) -> Vec<DownloadLogEntry> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(_) => return Vec::new(),
        };

        let mut entries = Vec::new();
        for path in read_dir.flatten().map(|e| e.path()) {
            let is_log = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX));
            if !is_log {
                continue;
            }
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("Cannot read download log {}: {}", path.display(), e);
                    continue;
                }
            };
            entries.extend(
                BufReader::new(file)
                    .lines()
                    .map_while(Result::ok)
                    .filter_map(|line| serde_json::from_str::<DownloadLogEntry>(line.trim()).ok()),
            );
        }
        entries
    }

    pub fn stats(&self) -> DownloadStats {
        self.stats_on(Local::now().date_naive())
    }

    /// Stats with `today` as the reference day.
    pub fn stats_on(&self, today: NaiveDate) -> DownloadStats {
        aggregate(&self.entries(), today)
    }

    /// Successful downloads of one user and the most recent one.
    pub fn user_stats(&self, user_id: i64) -> UserStats {
        user_slice(&self.entries(), user_id)
    }

    /// Per-user and global stats from a single pass over the files.
    pub fn report(&self, user_id: i64) -> StatsReport {
        self.report_on(user_id, Local::now().date_naive())
    }

    pub fn report_on(&self, user_id: i64, today: NaiveDate) -> StatsReport {
        let entries = self.entries();
        StatsReport {
            user: user_slice(&entries, user_id),
            global: aggregate(&entries, today),
        }
    }
}

/// What the stats screen shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsReport {
    pub user: UserStats,
    pub global: DownloadStats,
}

fn aggregate(entries: &[DownloadLogEntry], today: NaiveDate) -> DownloadStats {
    let mut stats = DownloadStats::default();
    for entry in entries {
        stats.total += 1;
        if entry.success {
            stats.successful += 1;
        } else {
            stats.failed += 1;
        }
        stats.total_size += entry.file_size;
        if entry.timestamp.date_naive() == today {
            stats.today += 1;
        }
    }
    stats
}

fn user_slice(entries: &[DownloadLogEntry], user_id: i64) -> UserStats {
    entries
        .iter()
        .filter(|e| e.user_id == user_id && e.success)
        .fold(UserStats::default(), |mut acc, e| {
            acc.downloads += 1;
            if acc.last.is_none_or(|last| e.timestamp > last) {
                acc.last = Some(e.timestamp);
            }
            acc
        })
}
