//! Outlier removal for raw metric samples.
//!
//! Two passes: a z-score gate over the whole sample, then an IQR fence over
//! the survivors. Neither pass ever empties a non-empty sample; each falls
//! back to its own input instead.
//!
//! The returned values are not guaranteed to keep input order. Callers that
//! need ordering must sort the result themselves.

use log::debug;

use crate::algorithms::stats::{mean, nearest_rank, population_std_dev, sorted_ascending};
use crate::core::config::OutlierSettings;

/// Two-pass z-score / IQR outlier filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierFilter {
    settings: OutlierSettings,
}

impl OutlierFilter {
    pub fn new(settings: OutlierSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OutlierSettings {
        &self.settings
    }

    /// Remove statistically anomalous values.
    ///
    /// Samples smaller than `min_samples` and samples with zero spread are
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use weather_analytics::transformations::OutlierFilter;
    ///
    /// let filter = OutlierFilter::default();
    /// let cleaned = filter.filter(&[10.0, 10.0, 10.0, 10.0, 10.0]);
    /// assert_eq!(cleaned, vec![10.0; 5]);
    /// ```
    pub fn filter(&self, values: &[f64]) -> Vec<f64> {
        if values.len() < self.settings.min_samples {
            return values.to_vec();
        }

        let (mean, std) = match (mean(values), population_std_dev(values)) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return values.to_vec(),
        };
        if std == 0.0 {
            return values.to_vec();
        }

        let z_filtered: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| ((v - mean) / std).abs() < self.settings.z_threshold)
            .collect();
        if z_filtered.is_empty() {
            return values.to_vec();
        }

        let sorted = sorted_ascending(&z_filtered);
        let (q1, q3) = match (nearest_rank(&sorted, 0.25), nearest_rank(&sorted, 0.75)) {
            (Some(q1), Some(q3)) => (q1, q3),
            _ => return z_filtered,
        };
        let iqr = q3 - q1;
        let lower = q1 - self.settings.iqr_multiplier * iqr;
        let upper = q3 + self.settings.iqr_multiplier * iqr;

        let fenced: Vec<f64> = z_filtered
            .iter()
            .copied()
            .filter(|v| *v >= lower && *v <= upper)
            .collect();

        debug!(
            "Outlier filter: {} raw, {} after z-score, {} after IQR [{}, {}]",
            values.len(),
            z_filtered.len(),
            fenced.len(),
            lower,
            upper
        );

        if fenced.is_empty() {
            z_filtered
        } else {
            fenced
        }
    }
}

/// Remove outliers with the default thresholds (z < 3, 1.5 x IQR, at least 5 samples).
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    OutlierFilter::default().filter(values)
}
