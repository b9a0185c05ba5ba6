//! Error types for the analytics core.
//!
//! Only the forecaster and the polynomial fitter raise errors during normal
//! operation; the outlier filter and the bucketizer degrade instead. Every
//! error carries a kind so callers can decide whether to wait for more data
//! or to change parameters without parsing messages.

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Error type for analytics operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Insufficient data: need at least {required} points, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Fieldless discriminant of [`AnalyticsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientData,
    SingularMatrix,
    EmptyInput,
    InvalidInput,
    Configuration,
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::InsufficientData { .. } => ErrorKind::InsufficientData,
            AnalyticsError::SingularMatrix(_) => ErrorKind::SingularMatrix,
            AnalyticsError::EmptyInput(_) => ErrorKind::EmptyInput,
            AnalyticsError::InvalidInput(_) => ErrorKind::InvalidInput,
            AnalyticsError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether waiting for more observations may make the same call succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::InsufficientData | ErrorKind::EmptyInput)
    }
}
