//! Async service layer over the analytics pipeline.
//!
//! Fetches inputs through the repository traits and hands them to
//! [`AnalyticsPipeline`]. All numeric work stays synchronous.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weather_analytics::db::LocalRepository;
//! use weather_analytics::services::{AnalyticsPipeline, MiningOutcome, WeatherAnalyticsService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = WeatherAnalyticsService::new(Arc::new(LocalRepository::new()), AnalyticsPipeline::new());
//! assert_eq!(service.mining(1).await?, MiningOutcome::NoData);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::core::domain::{AggregatePoint, ForecastResult, IntervalType};
use crate::core::error::AnalyticsError;
use crate::db::repository::{
    AggregateRepository, ReadingRepository, RepositoryError, RepositoryResult, WeatherRepository,
};
use crate::services::pipeline::{AnalyticsPipeline, MiningOutcome};

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Aggregate point with its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledAggregate {
    pub label: String,
    pub point: AggregatePoint,
}

/// Per-interval overview; a failed interval carries its error message.
pub type AggregatedOverview = BTreeMap<IntervalType, Result<Vec<LabeledAggregate>, String>>;

/// Site-level analytics over a weather repository.
pub struct WeatherAnalyticsService<R> {
    repo: Arc<R>,
    pipeline: AnalyticsPipeline,
}

impl<R> Clone for WeatherAnalyticsService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<R: WeatherRepository> WeatherAnalyticsService<R> {
    pub fn new(repo: Arc<R>, pipeline: AnalyticsPipeline) -> Self {
        Self { repo, pipeline }
    }

    pub fn pipeline(&self) -> &AnalyticsPipeline {
        &self.pipeline
    }

    pub async fn health_check(&self) -> ServiceResult<bool> {
        Ok(self.repo.health_check().await?)
    }

    /// Mine every stored reading for a site.
    ///
    /// # Returns
    /// * `Ok(MiningOutcome::NoData)` - The site has no usable readings
    /// * `Err(ServiceError::Repository)` - If the readings cannot be fetched
    pub async fn mining(&self, site_id: i64) -> ServiceResult<MiningOutcome> {
        let readings = self.repo.fetch_readings(site_id).await?;
        debug!("Mining {} readings for site {}", readings.len(), site_id);
        Ok(self.pipeline.mine(&readings))
    }

    /// Forecast the next period for a site and classify it.
    ///
    /// Readings and the configured interval's history are fetched
    /// concurrently; category ranges come from mining the readings.
    ///
    /// # Returns
    /// * `Ok(ForecastResult)` - Prediction, possibly without a category
    /// * `Err(ServiceError::Analytics)` - Not enough history or an ill-posed fit
    /// * `Err(ServiceError::Repository)` - If either fetch fails
    pub async fn predict_next(&self, site_id: i64) -> ServiceResult<ForecastResult> {
        let interval = self.pipeline.config().forecast.interval;
        let (readings, history) = tokio::join!(
            self.repo.fetch_readings(site_id),
            self.repo.fetch_aggregates(site_id, interval)
        );
        let (readings, history) = (readings?, history?);

        let ranges = self.pipeline.mine(&readings).ranges();
        let result = self.pipeline.forecast(site_id, &history, &ranges)?;
        info!(
            "Site {} next {}: {} ({})",
            site_id,
            interval,
            result.predicted_value,
            result.predicted_category.as_deref().unwrap_or("unclassified")
        );
        Ok(result)
    }

    /// Labeled aggregates for every interval type.
    ///
    /// One failing interval never fails the others; its entry carries the
    /// error message instead.
    pub async fn aggregated_overview(&self, site_id: i64) -> AggregatedOverview {
        let (minute, hour, day, month) = tokio::join!(
            self.repo.fetch_aggregates(site_id, IntervalType::Minute),
            self.repo.fetch_aggregates(site_id, IntervalType::Hour),
            self.repo.fetch_aggregates(site_id, IntervalType::Day),
            self.repo.fetch_aggregates(site_id, IntervalType::Month)
        );

        IntervalType::ALL
            .into_iter()
            .zip([minute, hour, day, month])
            .map(|(interval, fetched)| (interval, label_points(site_id, interval, fetched)))
            .collect()
    }
}

fn label_points(
    site_id: i64,
    interval: IntervalType,
    fetched: RepositoryResult<Vec<AggregatePoint>>,
) -> Result<Vec<LabeledAggregate>, String> {
    match fetched {
        Ok(points) => Ok(points
            .into_iter()
            .map(|point| LabeledAggregate {
                label: interval.label(point.bucket_start),
                point,
            })
            .collect()),
        Err(e) => {
            error!("Site {}: failed to fetch {} aggregates: {}", site_id, interval, e);
            Err(e.to_string())
        }
    }
}
