//! Raw reading source.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::core::domain::Reading;

/// Repository trait for raw weather readings.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - Store is healthy
    /// * `Ok(false)` - Store responded but is degraded
    /// * `Err(RepositoryError)` - If the check itself fails
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch every reading recorded for a site, oldest first.
    ///
    /// # Arguments
    /// * `site_id` - Site to read
    ///
    /// # Returns
    /// * `Ok(Vec<Reading>)` - Possibly empty
    /// * `Err(RepositoryError)` - If the store is unavailable
    async fn fetch_readings(&self, site_id: i64) -> RepositoryResult<Vec<Reading>>;
}
