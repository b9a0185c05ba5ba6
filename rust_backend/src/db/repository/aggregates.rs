//! Aggregated history source.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::core::domain::{AggregatePoint, IntervalType};

/// Repository trait for bucketed aggregates.
#[async_trait]
pub trait AggregateRepository: Send + Sync {
    /// Fetch the aggregates of one interval for a site.
    ///
    /// # Arguments
    /// * `site_id` - Site to read
    /// * `interval` - Bucket width
    ///
    /// # Returns
    /// * `Ok(Vec<AggregatePoint>)` - Ordered ascending by `bucket_start`
    /// * `Err(RepositoryError)` - If the store is unavailable
    async fn fetch_aggregates(
        &self,
        site_id: i64,
        interval: IntervalType,
    ) -> RepositoryResult<Vec<AggregatePoint>>;
}
