//! Error types for repository operations.

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failure reaching or querying a weather store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// The store is unreachable or unhealthy
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The store answered, but the lookup itself failed
    #[error("Query error: {0}")]
    QueryError(String),
}
