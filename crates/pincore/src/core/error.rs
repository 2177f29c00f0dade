use thiserror::Error;

/// Errors of the entry points used outside the chat flow (CLI, startup)
///
/// # Example
///
/// ```
/// use pincore::core::error::AppError;
///
/// let err = AppError::Validation("empty link".to_string());
/// assert_eq!(err.to_string(), "Validation error: empty link");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
