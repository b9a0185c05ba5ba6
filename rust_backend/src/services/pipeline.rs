//! Mining and forecasting facade with a parallel batch runner.

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::algorithms::classification::{classify_with_basis, AuxiliarySignals};
use crate::algorithms::clustering::KMeans1D;
use crate::algorithms::profiling::{metric_average, profile_categories};
use crate::core::config::AnalyticsConfig;
use crate::core::domain::{
    polynomial_model_id, AggregatePoint, CategoryProfile, Cluster, ForecastResult, Metric,
    ProfiledMetric, Reading,
};
use crate::core::error::{AnalyticsError, AnalyticsResult, ErrorKind};
use crate::services::forecast::Forecaster;
use crate::transformations::cleaning::OutlierFilter;
use crate::transformations::filtering::{primary_values, validate_readings};

/// Summary of one batch of raw readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningReport {
    pub total_raw: usize,
    pub total_cleaned: usize,
    pub clusters: Vec<Cluster>,
    pub ranges: CategoryProfile,
    pub wind_avg: Option<f64>,
    pub humidity_avg: Option<f64>,
    pub pressure_avg: Option<f64>,
}

/// Mining output, or an explicit no-data status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MiningOutcome {
    NoData,
    Mined(MiningReport),
}

impl MiningOutcome {
    pub fn report(&self) -> Option<&MiningReport> {
        match self {
            MiningOutcome::Mined(report) => Some(report),
            MiningOutcome::NoData => None,
        }
    }

    /// Category ranges, empty when there was no data.
    pub fn ranges(&self) -> CategoryProfile {
        self.report().map(|r| r.ranges.clone()).unwrap_or_default()
    }
}

/// Everything the pipeline needs for one site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteInput {
    pub site_id: i64,
    pub readings: Vec<Reading>,
    pub history: Vec<AggregatePoint>,
}

/// Combined mining and forecasting output for one site
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub site_id: i64,
    pub mining: MiningOutcome,
    pub forecast: AnalyticsResult<ForecastResult>,
}

impl PipelineReport {
    pub fn forecast_error_kind(&self) -> Option<ErrorKind> {
        self.forecast.as_ref().err().map(AnalyticsError::kind)
    }
}

/// Single entry point for mining and forecasting
///
/// Each call owns its inputs and outputs, so one pipeline value can serve
/// any number of sites concurrently.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsPipeline {
    config: AnalyticsConfig,
}

impl AnalyticsPipeline {
    /// Create a pipeline with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Clean, cluster and profile a batch of raw readings.
    ///
    /// A batch without a single finite value yields `MiningOutcome::NoData`.
    pub fn mine(&self, readings: &[Reading]) -> MiningOutcome {
        match self.mine_report(readings) {
            Some(report) => MiningOutcome::Mined(report),
            None => {
                warn!("No data to mine: {} readings, none finite", readings.len());
                MiningOutcome::NoData
            }
        }
    }

    /// Like [`mine`](Self::mine), reporting a batch without finite values as
    /// `AnalyticsError::EmptyInput`.
    pub fn try_mine(&self, readings: &[Reading]) -> AnalyticsResult<MiningReport> {
        self.mine_report(readings).ok_or_else(|| {
            AnalyticsError::EmptyInput(format!(
                "{} readings, none with a finite value",
                readings.len()
            ))
        })
    }

    fn mine_report(&self, readings: &[Reading]) -> Option<MiningReport> {
        let (is_valid, issues) = validate_readings(readings);
        if !is_valid {
            for issue in &issues {
                debug!("Reading batch issue: {}", issue);
            }
        }

        let raw = primary_values(readings);
        if raw.is_empty() {
            return None;
        }

        let cleaned = OutlierFilter::new(self.config.outliers).filter(&raw);
        let clustering = KMeans1D::new(self.config.clustering).run(&cleaned);
        if !clustering.converged {
            warn!(
                "Clusters reported from an unconverged k-means run ({} iterations)",
                clustering.iterations
            );
        }
        let ranges = profile_categories(readings);

        debug!(
            "Mined {} raw / {} cleaned values into {} clusters and {} categories",
            raw.len(),
            cleaned.len(),
            clustering.clusters.len(),
            ranges.len()
        );

        Some(MiningReport {
            total_raw: raw.len(),
            total_cleaned: cleaned.len(),
            clusters: clustering.clusters,
            ranges,
            wind_avg: metric_average(readings, ProfiledMetric::WindSpeed),
            humidity_avg: metric_average(readings, ProfiledMetric::Humidity),
            pressure_avg: metric_average(readings, ProfiledMetric::Pressure),
        })
    }

    /// Forecast next-period temperature for a site and classify it against `ranges`.
    ///
    /// Wind and humidity are forecast too when auxiliary signals are enabled;
    /// failures there only drop that vote.
    pub fn forecast(
        &self,
        site_id: i64,
        history: &[AggregatePoint],
        ranges: &CategoryProfile,
    ) -> AnalyticsResult<ForecastResult> {
        let forecaster = Forecaster::new(self.config.forecast);
        let temperature = forecaster.forecast_next(history, Metric::AvgTemp)?;

        let aux = if self.config.classification.use_auxiliary_signals {
            AuxiliarySignals {
                wind_speed: self.auxiliary(&forecaster, site_id, history, Metric::AvgWindSpeed),
                humidity: self.auxiliary(&forecaster, site_id, history, Metric::AvgHumidity),
            }
        } else {
            AuxiliarySignals::default()
        };

        let classification = classify_with_basis(temperature.predicted_value, ranges, Some(&aux));
        let matched_range = classification
            .as_ref()
            .and_then(|c| ranges.get(&c.category))
            .map(|r| r.temperature);

        if let Some(c) = &classification {
            debug!(
                "Site {}: {} classified as {} ({:?})",
                site_id, temperature.predicted_value, c.category, c.basis
            );
        }

        Ok(ForecastResult {
            site_id,
            interval: self.config.forecast.interval,
            predicted_value: temperature.predicted_value,
            predicted_category: classification.map(|c| c.category),
            matched_range,
            predicted_wind_speed: aux.wind_speed,
            predicted_humidity: aux.humidity,
            model_id: polynomial_model_id(self.config.forecast.degree),
            coefficients: temperature.coefficients,
            sample_count: history.len(),
        })
    }

    fn auxiliary(
        &self,
        forecaster: &Forecaster,
        site_id: i64,
        history: &[AggregatePoint],
        metric: Metric,
    ) -> Option<f64> {
        match forecaster.forecast_next(history, metric) {
            Ok(forecast) => Some(forecast.predicted_value),
            Err(e) => {
                warn!("Site {}: skipping {} vote: {}", site_id, metric, e);
                None
            }
        }
    }

    /// Run mining and forecasting for one site.
    pub fn run(&self, input: &SiteInput) -> PipelineReport {
        let mining = self.mine(&input.readings);
        let ranges = mining.ranges();
        let forecast = self.forecast(input.site_id, &input.history, &ranges);

        match &forecast {
            Ok(result) => info!(
                "Site {}: predicted {} ({}) from {} points",
                input.site_id,
                result.predicted_value,
                result.predicted_category.as_deref().unwrap_or("unclassified"),
                result.sample_count
            ),
            Err(e) => warn!("Site {}: forecast failed: {}", input.site_id, e),
        }

        PipelineReport {
            site_id: input.site_id,
            mining,
            forecast,
        }
    }

    /// Run one pipeline per site on `pool`.
    ///
    /// Reports come back in input order; sites never share state.
    pub fn run_batch(&self, inputs: &[SiteInput], pool: &ThreadPool) -> Vec<PipelineReport> {
        pool.install(|| inputs.par_iter().map(|input| self.run(input)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::IntervalType;
    use chrono::{Duration, TimeZone, Utc};

    fn readings() -> Vec<Reading> {
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let samples = [
            (29.0, "Clear"),
            (31.0, "Clear"),
            (30.0, "Clear"),
            (23.0, "Rain"),
            (25.0, "Rain"),
            (24.0, "Rain"),
        ];
        samples
            .iter()
            .enumerate()
            .map(|(i, (t, c))| {
                Reading::new(9, *t, start + Duration::minutes(10 * i as i64))
                    .with_category(*c)
                    .with_pressure(1010.0)
            })
            .collect()
    }

    fn history(n: usize, temp: impl Fn(usize) -> f64) -> Vec<AggregatePoint> {
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        (1..=n)
            .map(|i| {
                let mut p = AggregatePoint::new(9, IntervalType::Hour, start + Duration::hours(i as i64));
                p.avg_temp = Some(temp(i));
                p
            })
            .collect()
    }

    #[test]
    fn test_mine_reports_counts_and_ranges() {
        let outcome = AnalyticsPipeline::new().mine(&readings());
        let report = outcome.report().unwrap();
        assert_eq!(report.total_raw, 6);
        assert_eq!(report.total_cleaned, 6);
        assert_eq!(report.clusters.len(), 3);
        assert_eq!(report.ranges.len(), 2);
        assert_eq!(report.pressure_avg, Some(1010.0));
        assert_eq!(report.wind_avg, None);
    }

    #[test]
    fn test_mine_empty_is_no_data() {
        assert_eq!(AnalyticsPipeline::new().mine(&[]), MiningOutcome::NoData);
    }

    #[test]
    fn test_try_mine_reports_empty_input() {
        let pipeline = AnalyticsPipeline::new();
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let unusable = vec![Reading::new(9, f64::NAN, start).with_category("Clear")];

        let err = pipeline.try_mine(&unusable).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        assert!(err.is_retryable());
        assert_eq!(pipeline.mine(&unusable), MiningOutcome::NoData);

        let report = pipeline.try_mine(&readings()).unwrap();
        assert_eq!(Some(&report), pipeline.mine(&readings()).report());
    }

    #[test]
    fn test_forecast_classifies_into_containing_range() {
        let pipeline = AnalyticsPipeline::new();
        let ranges = pipeline.mine(&readings()).ranges();
        // 30 everywhere: next value is 30, inside Clear [29, 31]
        let result = pipeline.forecast(9, &history(24, |_| 30.0), &ranges).unwrap();

        assert_eq!(result.predicted_value, 30.0);
        assert_eq!(result.predicted_category.as_deref(), Some("Clear"));
        assert_eq!(result.matched_range.unwrap().min, Some(29.0));
        assert_eq!(result.model_id, "polynomial_regression_degree_2");
        assert_eq!(result.coefficients.len(), 3);
        assert_eq!(result.sample_count, 24);
        assert_eq!(result.predicted_wind_speed, None);
    }

    #[test]
    fn test_forecast_without_ranges_is_unclassified() {
        let result = AnalyticsPipeline::new()
            .forecast(9, &history(24, |i| i as f64), &CategoryProfile::new())
            .unwrap();
        assert_eq!(result.predicted_category, None);
        assert_eq!(result.matched_range, None);
    }

    #[test]
    fn test_run_keeps_forecast_error_kind() {
        let input = SiteInput {
            site_id: 9,
            readings: readings(),
            history: history(10, |_| 20.0),
        };
        let report = AnalyticsPipeline::new().run(&input);
        assert!(report.mining.report().is_some());
        assert_eq!(report.forecast_error_kind(), Some(ErrorKind::InsufficientData));
    }

    #[test]
    fn test_mining_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(MiningOutcome::NoData).unwrap();
        assert_eq!(json["status"], "no_data");

        let outcome = AnalyticsPipeline::new().mine(&readings());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "mined");
        assert_eq!(json["total_raw"], 6);
        assert_eq!(json["ranges"][0]["category"], "Clear");
    }
}
