//! Session and quality-selection flow.
//!
//! `Conversation` drives one user interaction at a time:
//!
//! 1. [`Conversation::classify`]: accept or reject the text, canonicalize it
//! 2. [`Conversation::analyze`]: extract metadata for the canonical link and
//!    store it as the user's session
//! 3. [`Conversation::select`]: resolve a quality id against that session
//! 4. [`Conversation::download_and_deliver`]: fetch the file, fit it into the
//!    upload limit, hand it to a [`VideoDelivery`] and delete it
//!
//! Transport concerns (messages, keyboards) stay in the bot crate.

pub mod error;
pub mod state;

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::conversion::{FfmpegCompressor, VideoCompressor};
use crate::core::config;
use crate::core::utils::{format_size, unique_filename};
use crate::core::validation::{canonicalize, is_supported};
use crate::download::error::DownloadError;
use crate::download::source::{FetchRequest, MediaExtractor, MediaFetcher};
use crate::download::types::{QualityOption, VideoInfo};
use crate::storage::{remove_file, DownloadLog, DownloadLogEntry, SessionStore};

pub use error::{FlowError, ERROR_DETAIL_MAX_CHARS};
pub use state::FlowState;

const DEFAULT_TITLE: &str = "Pinterest Video";

/// Size and duration ceilings applied before delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_file_size: u64,
    pub max_duration_secs: u64,
}

impl Limits {
    pub fn from_config() -> Self {
        Self {
            max_file_size: *config::limits::MAX_FILE_SIZE,
            max_duration_secs: *config::limits::MAX_VIDEO_DURATION,
        }
    }

    fn check_duration(&self, duration_secs: i64) -> Result<(), DownloadError> {
        if duration_secs > 0 && duration_secs as u64 > self.max_duration_secs {
            return Err(DownloadError::TooLong {
                duration_secs: duration_secs as u64,
                limit_secs: self.max_duration_secs,
            });
        }
        Ok(())
    }
}

/// A resolved quality together with the session it came from.
#[derive(Debug, Clone)]
pub struct Selection {
    pub info: Arc<VideoInfo>,
    pub quality: QualityOption,
}

/// A file ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedVideo {
    pub path: PathBuf,
    pub size: u64,
    pub duration_secs: i64,
    pub caption: String,
}

/// Outbound side of the flow: sends one video attachment.
#[async_trait]
pub trait VideoDelivery: Send + Sync {
    async fn deliver(&self, video: &PreparedVideo) -> anyhow::Result<()>;
}

/// Caption attached to a delivered video.
pub fn caption(title: &str, size_bytes: u64, label: &str) -> String {
    let title = if title.trim().is_empty() { DEFAULT_TITLE } else { title };
    format!("🎬 {}\n📦 {} • {}", title, format_size(size_bytes as i64), label)
}

pub struct Conversation {
    extractor: Arc<dyn MediaExtractor>,
    fetcher: Arc<dyn MediaFetcher>,
    compressor: Arc<dyn VideoCompressor>,
    sessions: Arc<dyn SessionStore>,
    videos_dir: PathBuf,
    limits: Limits,
    history: Option<DownloadLog>,
    states: DashMap<i64, FlowState>,
}

impl Conversation {
    pub fn new(
        extractor: Arc<dyn MediaExtractor>,
        fetcher: Arc<dyn MediaFetcher>,
        sessions: Arc<dyn SessionStore>,
        videos_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            fetcher,
            compressor: Arc::new(FfmpegCompressor),
            sessions,
            videos_dir: videos_dir.into(),
            limits: Limits::from_config(),
            history: None,
            states: DashMap::new(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn VideoCompressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_history(mut self, history: DownloadLog) -> Self {
        self.history = Some(history);
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn history(&self) -> Option<&DownloadLog> {
        self.history.as_ref()
    }

    /// Current session of a user, if any.
    pub fn session(&self, user_id: i64) -> Option<Arc<VideoInfo>> {
        self.sessions.get(user_id)
    }

    /// State of the user's latest interaction.
    pub fn state(&self, user_id: i64) -> FlowState {
        self.states.get(&user_id).map(|s| *s).unwrap_or_default()
    }

    fn transition(&self, user_id: i64, next: FlowState) {
        let previous = self.states.insert(user_id, next).unwrap_or_default();
        log::debug!("user {}: {} -> {}", user_id, previous, next);
    }

    fn fail(&self, user_id: i64, err: FlowError) -> FlowError {
        // invalid input returns to idle, everything else is a failed interaction
        let next = if err == FlowError::InvalidInput {
            FlowState::Idle
        } else {
            FlowState::Failed
        };
        self.transition(user_id, next);
        err
    }

    /// Starts a new interaction with `text` and returns its canonical link.
    /// Unsupported text sends the user back to `Idle`.
    pub fn classify(&self, user_id: i64, text: &str) -> Result<String, FlowError> {
        self.transition(user_id, FlowState::AwaitingClassification);
        if !is_supported(text) {
            return Err(self.fail(user_id, FlowError::InvalidInput));
        }
        Ok(canonicalize(text))
    }

    /// Extracts the link returned by [`Conversation::classify`], storing the
    /// result as the user's session. The session is left untouched on any
    /// failure.
    pub async fn analyze(&self, user_id: i64, url: &str) -> Result<Arc<VideoInfo>, FlowError> {
        self.transition(user_id, FlowState::AwaitingExtraction);
        log::info!("user {}: extracting {} via {}", user_id, url, self.extractor.name());

        let info = match self.extractor.extract(url).await {
            Ok(Some(info)) if !info.qualities.is_empty() => Arc::new(info),
            Ok(_) => {
                log::info!("user {}: nothing playable at {}", user_id, url);
                return Err(self.fail(user_id, FlowError::ExtractionUnavailable));
            }
            Err(e) => {
                log::warn!("user {}: extraction failed for {} [{}]: {}", user_id, url, e.subcategory(), e);
                return Err(self.fail(user_id, FlowError::ExtractionUnavailable));
            }
        };

        self.sessions.put(user_id, Arc::clone(&info));
        self.transition(user_id, FlowState::PresentingOptions);
        Ok(info)
    }

    /// Resolves `quality_id` against the user's current session.
    pub fn select(&self, user_id: i64, quality_id: &str) -> Result<Selection, FlowError> {
        let (info, quality) = self
            .sessions
            .select_quality(user_id, quality_id)
            .map_err(|e| self.fail(user_id, e.into()))?;
        Ok(Selection { info, quality })
    }

    /// Fetches the selected quality, hands it to `delivery` and deletes the
    /// local copy. Partial or undelivered files are left for the sweeper.
    pub async fn download_and_deliver(
        &self,
        user_id: i64,
        username: &str,
        selection: &Selection,
        delivery: &dyn VideoDelivery,
    ) -> Result<PreparedVideo, FlowError> {
        self.transition(user_id, FlowState::Downloading);

        let outcome = self.download_and_deliver_inner(user_id, selection, delivery).await;
        let (success, size, duration) = match &outcome {
            Ok(video) => (true, video.size, video.duration_secs),
            Err(_) => (false, 0, selection.info.duration_secs),
        };
        self.record(user_id, username, &selection.info.url, success, size, duration);

        match outcome {
            Ok(video) => {
                self.transition(user_id, FlowState::Delivered);
                Ok(video)
            }
            Err(e) => {
                log::warn!("user {}: {}", user_id, e);
                Err(self.fail(user_id, e))
            }
        }
    }

    async fn download_and_deliver_inner(
        &self,
        user_id: i64,
        selection: &Selection,
        delivery: &dyn VideoDelivery,
    ) -> Result<PreparedVideo, FlowError> {
        let Selection { info, quality } = selection;
        let fetch_failure = |e: DownloadError| FlowError::FetchFailure(e.to_string());

        self.limits.check_duration(info.duration_secs).map_err(fetch_failure)?;

        let filename = unique_filename(&format!("pinterest_{}", user_id), config::download::DEFAULT_EXTENSION);
        let request = FetchRequest::new(quality.url.clone(), self.videos_dir.join(filename));
        log::info!(
            "user {}: fetching {} ({}) to {}",
            user_id,
            quality.label,
            quality.id,
            request.output_path.display()
        );

        let result = match self.fetcher.fetch(&request).await {
            Ok(Some(result)) if result.success => result,
            Ok(_) => return Err(FlowError::FetchFailure("download produced no file".to_string())),
            Err(e) => return Err(fetch_failure(e)),
        };
        self.limits.check_duration(result.duration_secs).map_err(fetch_failure)?;

        let mut path = result.path.clone();
        let mut size = result.size;
        if size > self.limits.max_file_size {
            log::info!(
                "user {}: {} exceeds {} bytes, compressing",
                user_id,
                format_size(size as i64),
                self.limits.max_file_size
            );
            path = self
                .compressor
                .compress(&result.path, self.limits.max_file_size)
                .await
                .map_err(fetch_failure)?;
            size = tokio::fs::metadata(&path)
                .await
                .map_err(|e| FlowError::FetchFailure(e.to_string()))?
                .len();
            if size > self.limits.max_file_size {
                return Err(fetch_failure(DownloadError::TooLarge {
                    size_bytes: size,
                    limit_bytes: self.limits.max_file_size,
                }));
            }
        }

        let duration_secs = if result.duration_secs > 0 {
            result.duration_secs
        } else {
            info.duration_secs
        };
        let video = PreparedVideo {
            caption: caption(&info.title, size, &quality.label),
            path,
            size,
            duration_secs,
        };

        delivery
            .deliver(&video)
            .await
            .map_err(|e| FlowError::DeliveryFailure(e.to_string()))?;

        remove_file(&video.path);
        if video.path != result.path {
            remove_file(&result.path);
        }
        log::info!("user {}: delivered {} ({} bytes)", user_id, quality.label, video.size);
        Ok(video)
    }

    fn record(&self, user_id: i64, username: &str, url: &str, success: bool, size: u64, duration: i64) {
        let Some(history) = &self.history else {
            return;
        };
        let entry = DownloadLogEntry::new(user_id, username, url, success, size, duration);
        if let Err(e) = history.record(&entry) {
            log::warn!("Failed to write download log: {}", e);
        }
    }
}
