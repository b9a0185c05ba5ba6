//! In-memory local repository implementation.
//!
//! Stores readings and aggregates in HashMaps, which keeps tests fast,
//! deterministic, and isolated from any real backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::domain::{AggregatePoint, IntervalType, Reading};
use crate::db::repository::*;

/// In-memory local repository.
///
/// Clones share the same underlying store.
///
/// # Example
/// ```
/// use weather_analytics::db::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.reading_count(1), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    readings: HashMap<i64, Vec<Reading>>,
    aggregates: HashMap<(i64, IntervalType), Vec<AggregatePoint>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            readings: HashMap::new(),
            aggregates: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds consistent data: every write below is a
    // single insert or sort.
    fn read(&self) -> RwLockReadGuard<'_, LocalData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocalData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Add readings, each filed under its own site.
    ///
    /// Per-site readings stay sorted by timestamp.
    pub fn add_readings(&self, readings: impl IntoIterator<Item = Reading>) {
        let mut data = self.write();
        for reading in readings {
            data.readings.entry(reading.site_id).or_default().push(reading);
        }
        for site in data.readings.values_mut() {
            site.sort_by_key(|r| r.timestamp);
        }
    }

    /// Add aggregate points, each filed under its own site and interval.
    ///
    /// Per-series points stay sorted by `bucket_start`.
    pub fn add_aggregates(&self, points: impl IntoIterator<Item = AggregatePoint>) {
        let mut data = self.write();
        for point in points {
            data.aggregates
                .entry((point.site_id, point.interval))
                .or_default()
                .push(point);
        }
        for series in data.aggregates.values_mut() {
            series.sort_by_key(|p| p.bucket_start);
        }
    }

    pub fn reading_count(&self, site_id: i64) -> usize {
        self.read().readings.get(&site_id).map_or(0, Vec::len)
    }

    /// Set the health status (for testing).
    pub fn set_healthy(&self, healthy: bool) {
        self.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.write();
        data.readings.clear();
        data.aggregates.clear();
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.read().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Database is not healthy".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.read().is_healthy)
    }

    async fn fetch_readings(&self, site_id: i64) -> RepositoryResult<Vec<Reading>> {
        self.check_health()?;
        Ok(self.read().readings.get(&site_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AggregateRepository for LocalRepository {
    async fn fetch_aggregates(
        &self,
        site_id: i64,
        interval: IntervalType,
    ) -> RepositoryResult<Vec<AggregatePoint>> {
        self.check_health()?;
        Ok(self
            .read()
            .aggregates
            .get(&(site_id, interval))
            .cloned()
            .unwrap_or_default())
    }
}
