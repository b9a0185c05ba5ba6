//! Map a numeric forecast onto a weather category.
//!
//! Temperature is the primary signal. A prediction inside exactly one
//! category's temperature range is returned at once. Inside several, the
//! narrowest range wins; inside none, the category with the nearest average.
//! Optional wind and humidity predictions each cast a nearest-average vote
//! and the majority of all votes wins, with the temperature vote breaking ties.
//!
//! Every "first encountered" tie-break follows the profile's insertion order.

use serde::{Deserialize, Serialize};

use crate::core::domain::{CategoryProfile, CategoryRange, ProfiledMetric};

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    UniqueContainment,
    NarrowestContainment,
    NearestCenter,
    Vote,
}

/// Predicted category and the rule that chose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub basis: MatchBasis,
}

/// Secondary forecasts that may vote alongside temperature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuxiliarySignals {
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
}

impl AuxiliarySignals {
    pub fn is_empty(&self) -> bool {
        self.wind_speed.is_none() && self.humidity.is_none()
    }
}

/// Predicted category for `predicted_value`, or `None` when `profile` is empty.
///
/// # Examples
///
/// ```
/// use weather_analytics::algorithms::classification::classify;
/// use weather_analytics::core::CategoryProfile;
///
/// assert_eq!(classify(30.0, &CategoryProfile::new(), None), None);
/// ```
pub fn classify(
    predicted_value: f64,
    profile: &CategoryProfile,
    aux: Option<&AuxiliarySignals>,
) -> Option<String> {
    classify_with_basis(predicted_value, profile, aux).map(|c| c.category)
}

/// Like [`classify`], also reporting which rule decided.
pub fn classify_with_basis(
    predicted_value: f64,
    profile: &CategoryProfile,
    aux: Option<&AuxiliarySignals>,
) -> Option<Classification> {
    if profile.is_empty() {
        return None;
    }

    let containing: Vec<&CategoryRange> = profile
        .iter()
        .filter(|r| r.temperature.contains(predicted_value))
        .collect();

    if let [only] = containing.as_slice() {
        return Some(Classification {
            category: only.category.clone(),
            basis: MatchBasis::UniqueContainment,
        });
    }

    let (temperature_vote, temperature_basis) = if containing.is_empty() {
        (
            nearest_center(predicted_value, profile, ProfiledMetric::Temperature),
            MatchBasis::NearestCenter,
        )
    } else {
        (narrowest(&containing), MatchBasis::NarrowestContainment)
    };

    let aux = match aux {
        Some(aux) if !aux.is_empty() => aux,
        _ => {
            return temperature_vote.map(|category| Classification {
                category: category.to_string(),
                basis: temperature_basis,
            })
        }
    };

    let wind_vote = aux
        .wind_speed
        .and_then(|w| nearest_center(w, profile, ProfiledMetric::WindSpeed));
    let humidity_vote = aux
        .humidity
        .and_then(|h| nearest_center(h, profile, ProfiledMetric::Humidity));

    let votes: Vec<&str> = [temperature_vote, wind_vote, humidity_vote]
        .into_iter()
        .flatten()
        .collect();

    let majority = votes
        .iter()
        .find(|candidate| votes.iter().filter(|v| v == candidate).count() * 2 > votes.len())
        .copied();

    majority
        .or(temperature_vote)
        .or_else(|| votes.first().copied())
        .map(|category| Classification {
            category: category.to_string(),
            basis: MatchBasis::Vote,
        })
}

/// Containing range with the smallest span; the first one wins ties.
fn narrowest<'a>(containing: &[&'a CategoryRange]) -> Option<&'a str> {
    let mut best: Option<(&'a CategoryRange, f64)> = None;
    for &range in containing {
        let span = match range.temperature.span() {
            Some(span) => span,
            None => continue,
        };
        match best {
            Some((_, best_span)) if span >= best_span => {}
            _ => best = Some((range, span)),
        }
    }
    best.map(|(range, _)| range.category.as_str())
}

/// Category whose average for `metric` is nearest to `value`; the first one wins ties.
fn nearest_center<'a>(
    value: f64,
    profile: &'a CategoryProfile,
    metric: ProfiledMetric,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, f64)> = None;
    for range in profile.iter() {
        let avg = match range.range(metric).avg {
            Some(avg) => avg,
            None => continue,
        };
        let dist = (value - avg).abs();
        if dist.is_nan() {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((range.category.as_str(), dist)),
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::MetricRange;

    fn metric(min: f64, max: f64, avg: f64) -> MetricRange {
        MetricRange {
            min: Some(min),
            max: Some(max),
            avg: Some(avg),
            count: 4,
        }
    }

    fn category(name: &str, temperature: MetricRange) -> CategoryRange {
        CategoryRange {
            category: name.to_string(),
            temperature,
            wind_speed: MetricRange::default(),
            humidity: MetricRange::default(),
            pressure: MetricRange::default(),
        }
    }

    fn clear_and_rain() -> CategoryProfile {
        [
            category("Clear", metric(28.0, 32.0, 30.0)),
            category("Rain", metric(22.0, 26.0, 24.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unique_containment() {
        let result = classify_with_basis(30.0, &clear_and_rain(), None).unwrap();
        assert_eq!(result.category, "Clear");
        assert_eq!(result.basis, MatchBasis::UniqueContainment);
    }

    #[test]
    fn test_unique_containment_ignores_auxiliary_votes() {
        let mut profile = clear_and_rain();
        let mut rain = profile.get("Rain").cloned().unwrap();
        rain.wind_speed = metric(5.0, 9.0, 7.0);
        rain.humidity = metric(80.0, 95.0, 90.0);
        profile.insert(rain);

        let aux = AuxiliarySignals {
            wind_speed: Some(7.0),
            humidity: Some(90.0),
        };
        assert_eq!(classify(30.0, &profile, Some(&aux)), Some("Clear".to_string()));
    }

    #[test]
    fn test_empty_profile_is_none() {
        assert_eq!(classify(30.0, &CategoryProfile::new(), None), None);
        let aux = AuxiliarySignals {
            wind_speed: Some(1.0),
            humidity: None,
        };
        assert_eq!(classify(30.0, &CategoryProfile::new(), Some(&aux)), None);
    }

    #[test]
    fn test_narrowest_of_several_containing_ranges() {
        let profile: CategoryProfile = [
            category("Clouds", metric(20.0, 34.0, 27.0)),
            category("Haze", metric(27.0, 31.0, 29.0)),
            category("Clear", metric(26.0, 33.0, 30.0)),
        ]
        .into_iter()
        .collect();

        let result = classify_with_basis(28.0, &profile, None).unwrap();
        assert_eq!(result.category, "Haze");
        assert_eq!(result.basis, MatchBasis::NarrowestContainment);
    }

    #[test]
    fn test_narrowest_tie_goes_to_first_inserted() {
        let profile: CategoryProfile = [
            category("Mist", metric(20.0, 30.0, 25.0)),
            category("Fog", metric(21.0, 31.0, 26.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(classify(25.0, &profile, None), Some("Mist".to_string()));
    }

    #[test]
    fn test_nearest_center_when_outside_all_ranges() {
        let result = classify_with_basis(27.0, &clear_and_rain(), None).unwrap();
        // |27 - 30| = 3 vs |27 - 24| = 3: tie, Clear was inserted first
        assert_eq!(result.category, "Clear");
        assert_eq!(result.basis, MatchBasis::NearestCenter);

        assert_eq!(classify(18.0, &clear_and_rain(), None), Some("Rain".to_string()));
        assert_eq!(classify(40.0, &clear_and_rain(), None), Some("Clear".to_string()));
    }

    #[test]
    fn test_auxiliary_majority_overrides_temperature() {
        let mut profile = clear_and_rain();
        let mut clear = profile.get("Clear").cloned().unwrap();
        clear.wind_speed = metric(1.0, 3.0, 2.0);
        clear.humidity = metric(40.0, 60.0, 50.0);
        profile.insert(clear);
        let mut rain = profile.get("Rain").cloned().unwrap();
        rain.wind_speed = metric(5.0, 9.0, 7.0);
        rain.humidity = metric(80.0, 95.0, 90.0);
        profile.insert(rain);

        // Temperature 27.5 is nearest Clear (2.5 vs 3.5); wind and humidity both point at Rain.
        let aux = AuxiliarySignals {
            wind_speed: Some(6.5),
            humidity: Some(88.0),
        };
        let result = classify_with_basis(27.5, &profile, Some(&aux)).unwrap();
        assert_eq!(result.category, "Rain");
        assert_eq!(result.basis, MatchBasis::Vote);
    }

    #[test]
    fn test_split_vote_falls_back_to_temperature() {
        let mut profile = clear_and_rain();
        let mut rain = profile.get("Rain").cloned().unwrap();
        rain.wind_speed = metric(5.0, 9.0, 7.0);
        profile.insert(rain);

        // Temperature says Clear, wind says Rain: one vote each.
        let aux = AuxiliarySignals {
            wind_speed: Some(6.0),
            humidity: None,
        };
        let result = classify_with_basis(27.5, &profile, Some(&aux)).unwrap();
        assert_eq!(result.category, "Clear");
        assert_eq!(result.basis, MatchBasis::Vote);
    }

    #[test]
    fn test_auxiliary_without_matching_ranges_keeps_temperature_basis() {
        let aux = AuxiliarySignals::default();
        let result = classify_with_basis(18.0, &clear_and_rain(), Some(&aux)).unwrap();
        assert_eq!(result.category, "Rain");
        assert_eq!(result.basis, MatchBasis::NearestCenter);
    }

    #[test]
    fn test_categories_without_temperature_are_skipped() {
        let profile: CategoryProfile = [
            category("Smoke", MetricRange::default()),
            category("Dust", metric(35.0, 40.0, 37.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(classify(10.0, &profile, None), Some("Dust".to_string()));
    }
}
