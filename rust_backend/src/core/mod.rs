//! Core domain models, errors and configuration for weather analytics.
//!
//! This module defines the data structures exchanged with the reading source,
//! the aggregate store and the result consumer, together with the error kinds
//! the numeric components can raise.

pub mod config;
pub mod domain;
pub mod error;

pub use config::{
    AnalyticsConfig, ClassificationSettings, ClusteringSettings, ForecastSettings, OutlierSettings,
};
pub use domain::{
    AggregatePoint, CategoryProfile, CategoryRange, Cluster, ForecastResult, IntervalType, Metric,
    MetricRange, ProfiledMetric, Reading,
};
pub use error::{AnalyticsError, AnalyticsResult, ErrorKind};
