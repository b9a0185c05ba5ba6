//! Primary value extraction and reading batch validation.

use crate::core::domain::Reading;

/// Primary metric values of all readings whose value is finite, in input order.
pub fn primary_values(readings: &[Reading]) -> Vec<f64> {
    readings
        .iter()
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .collect()
}

/// Check a reading batch for data quality problems.
///
/// Problems are reported, not fixed: downstream components already skip
/// missing categories and metrics.
pub fn validate_readings(readings: &[Reading]) -> (bool, Vec<String>) {
    let mut issues: Vec<String> = Vec::new();

    let non_finite_count = readings.iter().filter(|r| !r.value.is_finite()).count();
    if non_finite_count > 0 {
        issues.push(format!(
            "{} readings have a non-finite primary value",
            non_finite_count
        ));
    }

    let missing_category_count = readings
        .iter()
        .filter(|r| r.category.as_deref().map_or(true, |c| c.trim().is_empty()))
        .count();
    if missing_category_count > 0 {
        issues.push(format!(
            "{} readings have no weather category",
            missing_category_count
        ));
    }

    if let Some(first) = readings.first() {
        if readings.iter().any(|r| r.site_id != first.site_id) {
            issues.push("Readings belong to more than one site".to_string());
        }
    }

    if readings.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
        issues.push("Readings are not ordered by timestamp".to_string());
    }

    (issues.is_empty(), issues)
}
