//! Next-period forecasting over aggregated history.
//!
//! History is treated as an equally spaced sequence: the x value of a point
//! is its 1-based position in the ordered history, not its timestamp.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::regression::{predict, PolynomialFitter};
use crate::algorithms::stats::round_to;
use crate::core::config::ForecastSettings;
use crate::core::domain::{AggregatePoint, Metric};
use crate::core::error::{AnalyticsError, AnalyticsResult};

/// Numeric forecast for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub metric: Metric,
    /// Prediction at the next position, rounded to three places.
    pub predicted_value: f64,
    pub coefficients: Vec<f64>,
    /// Points that carried the metric and entered the fit.
    pub points_fitted: usize,
}

/// Polynomial next-period forecaster.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forecaster {
    settings: ForecastSettings,
}

impl Forecaster {
    pub fn new(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Forecast the value of `metric` one step past the end of `history`.
    ///
    /// Points missing the metric are dropped together with their position,
    /// so the remaining x values keep their original indices. The prediction
    /// is evaluated at `x = fitted points + 1`.
    ///
    /// # Returns
    /// * `Err(AnalyticsError::InsufficientData)` if `history`, or the points
    ///   that carry `metric`, number fewer than `min_history`
    /// * `Err(AnalyticsError::SingularMatrix)` if the fit is ill-posed or the
    ///   prediction is not finite
    pub fn forecast_next(&self, history: &[AggregatePoint], metric: Metric) -> AnalyticsResult<Forecast> {
        let required = self.settings.min_history;
        if history.len() < required {
            return Err(AnalyticsError::InsufficientData {
                required,
                available: history.len(),
            });
        }

        let (x, y): (Vec<f64>, Vec<f64>) = history
            .iter()
            .enumerate()
            .filter_map(|(i, point)| point.metric(metric).map(|v| ((i + 1) as f64, v)))
            .unzip();

        if x.len() < required {
            return Err(AnalyticsError::InsufficientData {
                required,
                available: x.len(),
            });
        }

        let coefficients = PolynomialFitter::new(self.settings.degree)
            .with_pivot_epsilon(self.settings.pivot_epsilon)
            .fit(&x, &y)?;

        let next_x = (x.len() + 1) as f64;
        let predicted_value = round_to(predict(&coefficients, next_x), 3);
        if !predicted_value.is_finite() {
            return Err(AnalyticsError::SingularMatrix(format!(
                "prediction for {} at x={} is not finite",
                metric, next_x
            )));
        }

        debug!(
            "Forecast {} from {} of {} points: {}",
            metric,
            x.len(),
            history.len(),
            predicted_value
        );

        Ok(Forecast {
            metric,
            predicted_value,
            coefficients,
            points_fitted: x.len(),
        })
    }
}

/// Forecast `metric` with the given degree and the default 24-point minimum.
///
/// Returns `(predicted_value, coefficients)`.
pub fn forecast_next(
    history: &[AggregatePoint],
    metric: Metric,
    degree: usize,
) -> AnalyticsResult<(f64, Vec<f64>)> {
    let forecaster = Forecaster::new(ForecastSettings {
        degree,
        ..ForecastSettings::default()
    });
    let forecast = forecaster.forecast_next(history, metric)?;
    Ok((forecast.predicted_value, forecast.coefficients))
}
