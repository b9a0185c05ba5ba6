//! Analytics configuration file support.
//!
//! This module reads pipeline tuning parameters from TOML. Every field has a
//! default, so an empty file (or no file at all) reproduces the stock
//! heuristics: z-score gate 3, IQR fence 1.5, k = 3, quadratic fit over at
//! least 24 points.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::domain::IntervalType;
use super::error::{AnalyticsError, AnalyticsResult};

/// Full analytics configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub outliers: OutlierSettings,
    #[serde(default)]
    pub clustering: ClusteringSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub classification: ClassificationSettings,
}

/// Outlier filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSettings {
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_z_threshold")]
    pub z_threshold: f64,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
}

/// 1-D k-means settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringSettings {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

/// Polynomial forecast settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_degree")]
    pub degree: usize,
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    #[serde(default = "default_pivot_epsilon")]
    pub pivot_epsilon: f64,
    #[serde(default = "default_interval")]
    pub interval: IntervalType,
}

/// Category classifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSettings {
    #[serde(default = "default_use_auxiliary_signals")]
    pub use_auxiliary_signals: bool,
}

fn default_min_samples() -> usize {
    5
}

fn default_z_threshold() -> f64 {
    3.0
}

fn default_iqr_multiplier() -> f64 {
    1.5
}

fn default_k() -> usize {
    3
}

fn default_max_iterations() -> usize {
    1000
}

fn default_degree() -> usize {
    2
}

fn default_min_history() -> usize {
    24
}

fn default_pivot_epsilon() -> f64 {
    1e-12
}

fn default_interval() -> IntervalType {
    IntervalType::Hour
}

fn default_use_auxiliary_signals() -> bool {
    true
}

impl Default for OutlierSettings {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            z_threshold: default_z_threshold(),
            iqr_multiplier: default_iqr_multiplier(),
        }
    }
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            k: default_k(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            min_history: default_min_history(),
            pivot_epsilon: default_pivot_epsilon(),
            interval: default_interval(),
        }
    }
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            use_auxiliary_signals: default_use_auxiliary_signals(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalyticsConfig)` if the file parses and validates
    /// * `Err(AnalyticsError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalyticsError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        let config: AnalyticsConfig = toml::from_str(content).map_err(|e| {
            AnalyticsError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analytics.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> AnalyticsResult<Self> {
        let search_paths = [
            PathBuf::from("analytics.toml"),
            PathBuf::from("rust_backend/analytics.toml"),
            PathBuf::from("../analytics.toml"),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(AnalyticsError::Configuration(
            "No analytics.toml found in standard locations".to_string(),
        ))
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let outliers = &self.outliers;
        if !(outliers.z_threshold > 0.0) {
            return Err(AnalyticsError::Configuration(format!(
                "outliers.z_threshold must be positive, got {}",
                outliers.z_threshold
            )));
        }
        if !(outliers.iqr_multiplier >= 0.0) {
            return Err(AnalyticsError::Configuration(format!(
                "outliers.iqr_multiplier must be non-negative, got {}",
                outliers.iqr_multiplier
            )));
        }

        if self.clustering.k == 0 {
            return Err(AnalyticsError::Configuration(
                "clustering.k must be at least 1".to_string(),
            ));
        }
        if self.clustering.max_iterations == 0 {
            return Err(AnalyticsError::Configuration(
                "clustering.max_iterations must be at least 1".to_string(),
            ));
        }

        let forecast = &self.forecast;
        if forecast.min_history <= forecast.degree {
            return Err(AnalyticsError::Configuration(format!(
                "forecast.min_history ({}) must exceed forecast.degree ({})",
                forecast.min_history, forecast.degree
            )));
        }
        if !(forecast.pivot_epsilon > 0.0) {
            return Err(AnalyticsError::Configuration(format!(
                "forecast.pivot_epsilon must be positive, got {}",
                forecast.pivot_epsilon
            )));
        }

        Ok(())
    }
}
