//! Conversation fixtures for handler tests

use async_trait::async_trait;
use pincore::download::{DownloadError, DownloadResult, FetchRequest, MediaExtractor, MediaFetcher};
use pincore::{Conversation, InMemorySessionStore, QualityOption, VideoInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Extractor that always finds the same video; never fetches.
pub struct FixedSource {
    info: Option<VideoInfo>,
    pub extractions: AtomicUsize,
}

#[async_trait]
impl MediaExtractor for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn extract(&self, _url: &str) -> Result<Option<VideoInfo>, DownloadError> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.clone())
    }
}

#[async_trait]
impl MediaFetcher for FixedSource {
    async fn fetch(&self, _request: &FetchRequest) -> Result<Option<DownloadResult>, DownloadError> {
        Ok(None)
    }
}

pub fn video(title: &str, ids: &[&str]) -> VideoInfo {
    VideoInfo {
        title: title.to_string(),
        duration: "0:10".to_string(),
        qualities: ids
            .iter()
            .map(|id| QualityOption {
                id: id.to_string(),
                label: id.to_string(),
                size: "1.0 KB".to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn conversation(info: Option<VideoInfo>) -> (Conversation, Arc<FixedSource>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FixedSource {
        info,
        extractions: AtomicUsize::new(0),
    });
    let conversation = Conversation::new(
        source.clone(),
        source.clone(),
        Arc::new(InMemorySessionStore::new()),
        dir.path().join("videos"),
    );
    (conversation, source, dir)
}
