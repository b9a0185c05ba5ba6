//! Domain types for weather observations and the analytics derived from them.
//!
//! Readings and aggregate points are produced by external collaborators and
//! are never mutated here. Clusters, category ranges and forecast results are
//! recomputed on every invocation and owned by the caller.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the time window an aggregate point summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    Minute,
    Hour,
    Day,
    Month,
}

impl IntervalType {
    /// All interval types, finest first.
    pub const ALL: [IntervalType; 4] = [
        IntervalType::Minute,
        IntervalType::Hour,
        IntervalType::Day,
        IntervalType::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalType::Minute => "minute",
            IntervalType::Hour => "hour",
            IntervalType::Day => "day",
            IntervalType::Month => "month",
        }
    }

    /// Length of the trailing window the aggregation job re-reads for this interval.
    ///
    /// A month is approximated as 30 days.
    pub fn lookback(&self) -> Duration {
        match self {
            IntervalType::Minute => Duration::minutes(1),
            IntervalType::Hour => Duration::hours(1),
            IntervalType::Day => Duration::hours(24),
            IntervalType::Month => Duration::days(30),
        }
    }

    /// Start of the trailing aggregation window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lookback()
    }

    /// Human-readable label for a bucket starting at `bucket_start` (UTC).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use weather_analytics::core::domain::IntervalType;
    ///
    /// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
    /// assert_eq!(IntervalType::Hour.label(ts), "Hour 14");
    /// assert_eq!(IntervalType::Day.label(ts), "7 Mar 2024");
    /// ```
    pub fn label(&self, bucket_start: DateTime<Utc>) -> String {
        match self {
            IntervalType::Minute => format!("Minute {}", bucket_start.format("%-M")),
            IntervalType::Hour => format!("Hour {}", bucket_start.format("%-H")),
            IntervalType::Day => bucket_start.format("%-d %b %Y").to_string(),
            IntervalType::Month => bucket_start.format("%b %Y").to_string(),
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(IntervalType::Minute),
            "hour" => Ok(IntervalType::Hour),
            "day" => Ok(IntervalType::Day),
            "month" => Ok(IntervalType::Month),
            _ => Err(format!("Unknown interval type: {}", s)),
        }
    }
}

/// A single raw observation for a site.
///
/// `value` is the primary metric (air temperature). The secondary metrics
/// are optional because upstream providers omit them from time to time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub site_id: i64,
    pub value: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading with only the primary metric set.
    pub fn new(site_id: i64, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            site_id,
            value,
            category: None,
            wind_speed: None,
            humidity: None,
            pressure: None,
            timestamp,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = Some(wind_speed);
        self
    }

    pub fn with_humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Value of a profiled metric, if present and finite.
    pub fn metric(&self, metric: ProfiledMetric) -> Option<f64> {
        let value = match metric {
            ProfiledMetric::Temperature => Some(self.value),
            ProfiledMetric::WindSpeed => self.wind_speed,
            ProfiledMetric::Humidity => self.humidity,
            ProfiledMetric::Pressure => self.pressure,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Metrics tracked per weather category by the profiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfiledMetric {
    Temperature,
    WindSpeed,
    Humidity,
    Pressure,
}

impl ProfiledMetric {
    pub const ALL: [ProfiledMetric; 4] = [
        ProfiledMetric::Temperature,
        ProfiledMetric::WindSpeed,
        ProfiledMetric::Humidity,
        ProfiledMetric::Pressure,
    ];
}

/// Columns of an aggregate point that can be forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AvgTemp,
    MinTemp,
    MaxTemp,
    AvgHumidity,
    AvgPressure,
    AvgWindSpeed,
    MaxWindSpeed,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::AvgTemp => "avg_temp",
            Metric::MinTemp => "min_temp",
            Metric::MaxTemp => "max_temp",
            Metric::AvgHumidity => "avg_humidity",
            Metric::AvgPressure => "avg_pressure",
            Metric::AvgWindSpeed => "avg_wind_speed",
            Metric::MaxWindSpeed => "max_wind_speed",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pre-aggregated bucket for a (site, interval) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatePoint {
    pub site_id: i64,
    pub interval: IntervalType,
    pub bucket_start: DateTime<Utc>,
    #[serde(default)]
    pub avg_temp: Option<f64>,
    #[serde(default)]
    pub min_temp: Option<f64>,
    #[serde(default)]
    pub max_temp: Option<f64>,
    #[serde(default)]
    pub avg_humidity: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub avg_wind_speed: Option<f64>,
    #[serde(default)]
    pub max_wind_speed: Option<f64>,
    #[serde(default)]
    pub dominant_category: String,
}

impl AggregatePoint {
    /// Create a point with every metric unset.
    pub fn new(site_id: i64, interval: IntervalType, bucket_start: DateTime<Utc>) -> Self {
        Self {
            site_id,
            interval,
            bucket_start,
            avg_temp: None,
            min_temp: None,
            max_temp: None,
            avg_humidity: None,
            avg_pressure: None,
            avg_wind_speed: None,
            max_wind_speed: None,
            dominant_category: String::new(),
        }
    }

    /// Value of `metric`, treating non-finite entries as missing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::AvgTemp => self.avg_temp,
            Metric::MinTemp => self.min_temp,
            Metric::MaxTemp => self.max_temp,
            Metric::AvgHumidity => self.avg_humidity,
            Metric::AvgPressure => self.avg_pressure,
            Metric::AvgWindSpeed => self.avg_wind_speed,
            Metric::MaxWindSpeed => self.max_wind_speed,
        };
        value.filter(|v| v.is_finite())
    }
}

/// A 1-D cluster of cleaned readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub center: f64,
    pub min: f64,
    pub max: f64,
    pub sample_size: usize,
}

/// Summary of one metric within one weather category.
///
/// All fields are `None` (and `count` is zero) when no reading in the
/// category carried the metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub count: usize,
}

impl MetricRange {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Inclusive containment test. Always false for an empty range.
    pub fn contains(&self, value: f64) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => value >= min && value <= max,
            _ => false,
        }
    }

    /// `max - min`, or `None` for an empty range.
    pub fn span(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }
}

/// Per-category ranges of every profiled metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub category: String,
    pub temperature: MetricRange,
    pub wind_speed: MetricRange,
    pub humidity: MetricRange,
    pub pressure: MetricRange,
}

impl CategoryRange {
    pub fn range(&self, metric: ProfiledMetric) -> &MetricRange {
        match metric {
            ProfiledMetric::Temperature => &self.temperature,
            ProfiledMetric::WindSpeed => &self.wind_speed,
            ProfiledMetric::Humidity => &self.humidity,
            ProfiledMetric::Pressure => &self.pressure,
        }
    }
}

/// Category ranges in first-seen order.
///
/// Insertion order is the iteration order every classifier tie-break relies
/// on, so two profiles built from the same readings always classify alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryProfile {
    ranges: Vec<CategoryRange>,
}

impl CategoryProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a range, replacing any existing range for the same category in place.
    pub fn insert(&mut self, range: CategoryRange) {
        match self.ranges.iter_mut().find(|r| r.category == range.category) {
            Some(existing) => *existing = range,
            None => self.ranges.push(range),
        }
    }

    pub fn get(&self, category: &str) -> Option<&CategoryRange> {
        self.ranges.iter().find(|r| r.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRange> {
        self.ranges.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.ranges.iter().map(|r| r.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromIterator<CategoryRange> for CategoryProfile {
    fn from_iter<I: IntoIterator<Item = CategoryRange>>(iter: I) -> Self {
        let mut profile = CategoryProfile::new();
        for range in iter {
            profile.insert(range);
        }
        profile
    }
}

/// Next-period forecast for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub site_id: i64,
    pub interval: IntervalType,
    pub predicted_value: f64,
    pub predicted_category: Option<String>,
    pub matched_range: Option<MetricRange>,
    pub predicted_wind_speed: Option<f64>,
    pub predicted_humidity: Option<f64>,
    pub model_id: String,
    pub coefficients: Vec<f64>,
    /// Number of aggregate points consumed, before missing values were dropped.
    pub sample_count: usize,
}

/// Identifier of the polynomial model used for a forecast.
pub fn polynomial_model_id(degree: usize) -> String {
    format!("polynomial_regression_degree_{}", degree)
}
