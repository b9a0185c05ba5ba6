//! Per-category metric ranges.
//!
//! Readings are grouped by their reported weather category. A reading that
//! lacks one metric still contributes the metrics it has; only readings
//! without a category are skipped entirely.

use super::stats::round_to;
use crate::core::domain::{CategoryProfile, CategoryRange, MetricRange, ProfiledMetric, Reading};

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    min: f64,
    max: f64,
    total: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.total += value;
        self.count += 1;
    }

    fn finish(&self) -> MetricRange {
        if self.count == 0 {
            return MetricRange::default();
        }
        MetricRange {
            min: Some(round_to(self.min, 2)),
            max: Some(round_to(self.max, 2)),
            avg: Some(round_to(self.total / self.count as f64, 2)),
            count: self.count,
        }
    }
}

/// Compute metric ranges for every category present in `readings`.
///
/// Categories appear in the order they are first seen. Min, max and avg
/// are rounded to two decimal places; rounding is monotone so
/// `min <= avg <= max` still holds afterwards.
pub fn profile_categories(readings: &[Reading]) -> CategoryProfile {
    let mut groups: Vec<(&str, [Accumulator; 4])> = Vec::new();

    for reading in readings {
        let category = match reading.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => continue,
        };

        let idx = match groups.iter().position(|(name, _)| *name == category) {
            Some(idx) => idx,
            None => {
                groups.push((category, [Accumulator::default(); 4]));
                groups.len() - 1
            }
        };

        let accumulators = &mut groups[idx].1;
        for (slot, metric) in accumulators.iter_mut().zip(ProfiledMetric::ALL) {
            if let Some(value) = reading.metric(metric) {
                slot.push(value);
            }
        }
    }

    groups
        .into_iter()
        .map(|(category, [temperature, wind_speed, humidity, pressure])| CategoryRange {
            category: category.to_string(),
            temperature: temperature.finish(),
            wind_speed: wind_speed.finish(),
            humidity: humidity.finish(),
            pressure: pressure.finish(),
        })
        .collect()
}

/// Mean of one metric over every reading that carries it, rounded to two places.
pub fn metric_average(readings: &[Reading], metric: ProfiledMetric) -> Option<f64> {
    let mut acc = Accumulator::default();
    for value in readings.iter().filter_map(|r| r.metric(metric)) {
        acc.push(value);
    }
    acc.finish().avg
}
