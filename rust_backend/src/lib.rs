//! Weather analytics backend.
//!
//! Mines per-site weather readings into outlier-free clusters and
//! per-category metric ranges, forecasts the next aggregated period with a
//! least-squares polynomial, and labels the forecast with a weather category.
//!
//! - [`core`]: Domain types, errors and TOML configuration
//! - [`transformations`]: Value extraction, batch validation and outlier removal
//! - [`algorithms`]: k-means bucketing, profiling, polynomial fitting and classification
//! - [`services`]: The [`AnalyticsPipeline`] facade and the async service layer
//! - [`db`]: Repository traits and an in-memory implementation
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use weather_analytics::{AnalyticsPipeline, Reading};
//!
//! let start = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
//! let readings: Vec<Reading> = [21.0, 22.5, 30.0, 31.0, 15.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, t)| Reading::new(1, *t, start + Duration::minutes(i as i64)).with_category("Clear"))
//!     .collect();
//!
//! let outcome = AnalyticsPipeline::new().mine(&readings);
//! assert_eq!(outcome.report().map(|r| r.total_raw), Some(5));
//! ```

pub mod algorithms;
pub mod core;
pub mod db;
pub mod services;
pub mod transformations;

pub use crate::core::{
    AggregatePoint, AnalyticsConfig, AnalyticsError, AnalyticsResult, CategoryProfile,
    CategoryRange, Cluster, ErrorKind, ForecastResult, IntervalType, Metric, MetricRange, Reading,
};
pub use services::{AnalyticsPipeline, MiningOutcome, MiningReport, PipelineReport, SiteInput};
