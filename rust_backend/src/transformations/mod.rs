//! Data cleaning and selection for raw readings.
//!
//! This module prepares raw reading batches for the mining components:
//! extracting the primary metric, flagging data quality problems, and
//! pruning statistical outliers.
//!
//! # Modules
//!
//! - [`cleaning`]: Two-pass z-score / IQR outlier removal
//! - [`filtering`]: Primary value extraction and batch validation
//!
//! # Example
//!
//! ```
//! use weather_analytics::transformations::remove_outliers;
//!
//! let cleaned = remove_outliers(&[20.0, 21.0, 22.0, 23.0, 40.0]);
//! assert!(!cleaned.contains(&40.0));
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{remove_outliers, OutlierFilter};
pub use filtering::{primary_values, validate_readings};
