use thiserror::Error;

use crate::core::utils::truncate_chars;
use crate::storage::SelectError;

/// Diagnostic text shown to users is cut to this many characters.
pub const ERROR_DETAIL_MAX_CHARS: usize = 100;

/// Terminal failures of one interaction. None of them is retried; the user
/// recovers by sending a link again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Text is not a supported link
    #[error("unsupported link")]
    InvalidInput,

    /// Extractor returned nothing or failed; the cause is not reliably known
    #[error("video could not be extracted")]
    ExtractionUnavailable,

    /// No session for the user at selection time
    #[error("session expired")]
    SessionExpired,

    /// Session exists but does not contain the requested quality
    #[error("quality {0} not available")]
    QualityNotFound(String),

    #[error("download failed: {0}")]
    FetchFailure(String),

    #[error("delivery failed: {0}")]
    DeliveryFailure(String),
}

impl FlowError {
    /// Truncated diagnostic for fetch/delivery failures.
    pub fn detail(&self) -> Option<String> {
        match self {
            FlowError::FetchFailure(msg) | FlowError::DeliveryFailure(msg) => {
                Some(truncate_chars(msg, ERROR_DETAIL_MAX_CHARS))
            }
            _ => None,
        }
    }
}

impl From<SelectError> for FlowError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NoSession => FlowError::SessionExpired,
            SelectError::QualityNotFound(id) => FlowError::QualityNotFound(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_error_mapping() {
        assert_eq!(FlowError::from(SelectError::NoSession), FlowError::SessionExpired);
        assert_eq!(
            FlowError::from(SelectError::QualityNotFound("hd".into())),
            FlowError::QualityNotFound("hd".into())
        );
    }

    #[test]
    fn test_detail_is_truncated() {
        let err = FlowError::FetchFailure("e".repeat(250));
        assert_eq!(err.detail().map(|d| d.len()), Some(ERROR_DETAIL_MAX_CHARS));
        assert_eq!(FlowError::DeliveryFailure("short".into()).detail().as_deref(), Some("short"));
        assert_eq!(FlowError::SessionExpired.detail(), None);
    }
}
