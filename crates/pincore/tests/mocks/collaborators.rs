#![allow(dead_code)] // each test binary uses a different subset

use async_trait::async_trait;
use pincore::conversation::{PreparedVideo, VideoDelivery};
use pincore::conversion::VideoCompressor;
use pincore::download::{DownloadError, DownloadResult, FetchRequest, MediaExtractor, MediaFetcher};
use pincore::storage::SessionStore;
use pincore::{QualityOption, VideoInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Session fixture with one quality per `(id, height)` pair, highest first.
pub fn sample_info(title: &str, qualities: &[(&str, u32)]) -> VideoInfo {
    let qualities: Vec<QualityOption> = qualities
        .iter()
        .map(|(id, height)| QualityOption {
            id: id.to_string(),
            label: format!("{}p", height),
            url: format!("https://v.pinimg.com/videos/{}.mp4", id),
            height: *height,
            filesize: 1024,
            size: "1.0 KB".to_string(),
            extension: "mp4".to_string(),
            has_audio: true,
            ..Default::default()
        })
        .collect();
    VideoInfo {
        title: title.to_string(),
        duration: "0:30".to_string(),
        duration_secs: 30,
        best_quality: qualities.first().map(|q| q.label.clone()).unwrap_or_default(),
        url: "https://pinterest.com/pin/1".to_string(),
        qualities,
        ..Default::default()
    }
}

enum ExtractOutcome {
    Found(VideoInfo),
    Empty,
    Fail(String),
}

pub struct MockExtractor {
    outcome: ExtractOutcome,
    pub urls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn returning(info: VideoInfo) -> Self {
        Self::with(ExtractOutcome::Found(info))
    }

    pub fn empty() -> Self {
        Self::with(ExtractOutcome::Empty)
    }

    pub fn failing(msg: &str) -> Self {
        Self::with(ExtractOutcome::Fail(msg.to_string()))
    }

    fn with(outcome: ExtractOutcome) -> Self {
        Self {
            outcome,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, url: &str) -> Result<Option<VideoInfo>, DownloadError> {
        self.urls.lock().unwrap().push(url.to_string());
        match &self.outcome {
            ExtractOutcome::Found(info) => Ok(Some(info.clone())),
            ExtractOutcome::Empty => Ok(None),
            ExtractOutcome::Fail(msg) => Err(DownloadError::YtDlp(msg.clone())),
        }
    }
}

enum FetchOutcome {
    /// Writes this many bytes to the requested path
    Write(usize),
    /// Writes a partial file, then fails
    Fail(String),
    Nothing,
}

pub struct MockFetcher {
    outcome: FetchOutcome,
    duration_secs: i64,
    pub requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    pub fn writing(bytes: usize) -> Self {
        Self::with(FetchOutcome::Write(bytes))
    }

    pub fn failing(msg: &str) -> Self {
        Self::with(FetchOutcome::Fail(msg.to_string()))
    }

    pub fn nothing() -> Self {
        Self::with(FetchOutcome::Nothing)
    }

    fn with(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            duration_secs: 30,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Duration reported by the downloaded file.
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Option<DownloadResult>, DownloadError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(parent) = request.output_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        match &self.outcome {
            FetchOutcome::Write(bytes) => {
                std::fs::write(&request.output_path, vec![0u8; *bytes]).unwrap();
                Ok(Some(DownloadResult {
                    path: request.output_path.clone(),
                    size: *bytes as u64,
                    title: "video".to_string(),
                    duration_secs: self.duration_secs,
                    resolution: "720x1280".to_string(),
                    format: "mp4".to_string(),
                    success: true,
                }))
            }
            FetchOutcome::Fail(msg) => {
                std::fs::write(&request.output_path, b"partial").unwrap();
                Err(DownloadError::YtDlp(msg.clone()))
            }
            FetchOutcome::Nothing => Ok(None),
        }
    }
}

/// Records what would have been uploaded.
#[derive(Default)]
pub struct MockDelivery {
    pub fail_with: Option<String>,
    pub delivered: Mutex<Vec<PreparedVideo>>,
    /// Whether the file existed at the moment of delivery
    pub file_present: AtomicUsize,
}

impl MockDelivery {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoDelivery for MockDelivery {
    async fn deliver(&self, video: &PreparedVideo) -> anyhow::Result<()> {
        if video.path.exists() {
            self.file_present.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(msg) = &self.fail_with {
            anyhow::bail!("{}", msg);
        }
        self.delivered.lock().unwrap().push(video.clone());
        Ok(())
    }
}

/// Writes a file of a fixed size next to the input instead of running ffmpeg.
pub struct MockCompressor {
    output_bytes: usize,
    pub calls: Mutex<Vec<(PathBuf, u64)>>,
}

impl MockCompressor {
    pub fn producing(output_bytes: usize) -> Self {
        Self {
            output_bytes,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoCompressor for MockCompressor {
    async fn compress(&self, input: &Path, max_bytes: u64) -> Result<PathBuf, DownloadError> {
        self.calls.lock().unwrap().push((input.to_path_buf(), max_bytes));
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
        let output = input.with_file_name(format!("{}_compressed.mp4", stem));
        std::fs::write(&output, vec![0u8; self.output_bytes]).unwrap();
        Ok(output)
    }
}

/// Hands out its sessions in turn, one per read, ignoring writes.
pub struct RotatingSessionStore {
    sessions: Vec<Arc<VideoInfo>>,
    reads: AtomicUsize,
}

impl RotatingSessionStore {
    pub fn new(sessions: Vec<VideoInfo>) -> Self {
        Self {
            sessions: sessions.into_iter().map(Arc::new).collect(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SessionStore for RotatingSessionStore {
    fn put(&self, _user_id: i64, _info: Arc<VideoInfo>) {}

    fn get(&self, _user_id: i64) -> Option<Arc<VideoInfo>> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        if self.sessions.is_empty() {
            return None;
        }
        Some(self.sessions[n % self.sessions.len()].clone())
    }
}
