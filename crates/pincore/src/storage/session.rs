//! Per-user session storage.
//!
//! One live [`VideoInfo`] per user. Writes are last-writer-wins: a newer
//! extraction for the same user silently replaces the previous one, and no
//! entry is ever removed for the lifetime of the process.

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::download::types::{QualityOption, VideoInfo};

/// Why a quality selection could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no session for this user")]
    NoSession,

    #[error("quality {0} is not part of the current session")]
    QualityNotFound(String),
}

/// Storage seam for sessions.
pub trait SessionStore: Send + Sync {
    /// Unconditional upsert.
    fn put(&self, user_id: i64, info: Arc<VideoInfo>);

    fn get(&self, user_id: i64) -> Option<Arc<VideoInfo>>;

    /// Looks up the user's session and the quality with `quality_id` in it.
    ///
    /// Both halves of the result come from the same read of the session.
    fn select_quality(&self, user_id: i64, quality_id: &str) -> Result<(Arc<VideoInfo>, QualityOption), SelectError> {
        let info = self.get(user_id).ok_or(SelectError::NoSession)?;
        let quality = info
            .quality(quality_id)
            .cloned()
            .ok_or_else(|| SelectError::QualityNotFound(quality_id.to_string()))?;
        Ok((info, quality))
    }
}

/// Process-wide in-memory store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<i64, Arc<VideoInfo>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, user_id: i64, info: Arc<VideoInfo>) {
        if self.sessions.insert(user_id, info).is_some() {
            log::debug!("Session for user {} replaced", user_id);
        }
    }

    fn get(&self, user_id: i64) -> Option<Arc<VideoInfo>> {
        self.sessions.get(&user_id).map(|entry| Arc::clone(entry.value()))
    }
}
