//! Service layer for forecasting and orchestration.
//!
//! - [`forecast`]: Next-period polynomial forecasts over aggregated history
//! - [`pipeline`]: [`AnalyticsPipeline`], the synchronous facade over mining
//!   and forecasting, with a rayon batch runner
//! - [`analytics`]: [`WeatherAnalyticsService`], an async wrapper that pulls
//!   inputs from a repository

pub mod analytics;
pub mod forecast;
pub mod pipeline;

pub use analytics::{
    AggregatedOverview, LabeledAggregate, ServiceError, ServiceResult, WeatherAnalyticsService,
};
pub use forecast::{forecast_next, Forecast, Forecaster};
pub use pipeline::{AnalyticsPipeline, MiningOutcome, MiningReport, PipelineReport, SiteInput};
