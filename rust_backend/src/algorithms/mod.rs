//! Numeric algorithms for weather analytics.
//!
//! This module provides the clustering, profiling, curve fitting and
//! classification steps of the analytics pipeline. Everything here is pure
//! and synchronous over in-memory slices.
//!
//! # Components
//!
//! - [`clustering`]: Deterministic 1-D k-means over cleaned readings
//! - [`profiling`]: Per-category metric ranges
//! - [`regression`]: Least-squares polynomial fitting with a pivoting solver
//! - [`classification`]: Forecast-to-category matching with signal voting
//! - [`stats`]: Shared descriptive statistics
//!
//! # Example
//!
//! ```
//! use weather_analytics::algorithms::{cluster_values, regression};
//!
//! let clusters = cluster_values(&[10.0, 10.5, 20.0, 21.0, 30.0], 3);
//! assert_eq!(clusters.len(), 3);
//!
//! let coeffs = regression::fit(&[1.0, 2.0], &[3.0, 5.0], 1).unwrap();
//! assert!((regression::predict(&coeffs, 3.0) - 7.0).abs() < 1e-9);
//! ```

pub mod classification;
pub mod clustering;
pub mod profiling;
pub mod regression;
pub mod stats;

#[cfg(test)]
mod regression_tests;

pub use classification::{
    classify, classify_with_basis, AuxiliarySignals, Classification, MatchBasis,
};
pub use clustering::{cluster_values, ClusteringResult, KMeans1D};
pub use profiling::{metric_average, profile_categories};
pub use regression::{fit, predict, solve_linear_system, PolynomialFitter};
