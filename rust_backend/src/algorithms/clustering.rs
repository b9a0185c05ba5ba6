//! Deterministic 1-D k-means bucketing of cleaned readings.

use log::{debug, error};
use serde::{Deserialize, Serialize};

use super::stats::{round_to, sorted_ascending};
use crate::core::config::ClusteringSettings;
use crate::core::domain::Cluster;

/// Result of a k-means run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
    pub iterations: usize,
    pub converged: bool,
}

/// Deterministic 1-D k-means.
///
/// Seeds are the `k` smallest values, distances are absolute differences and
/// ties go to the lowest cluster index, so identical input always yields
/// identical clusters.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeans1D {
    settings: ClusteringSettings,
}

impl KMeans1D {
    pub fn new(settings: ClusteringSettings) -> Self {
        Self { settings }
    }

    /// Shorthand for `k` clusters with the default iteration cap.
    pub fn with_k(k: usize) -> Self {
        Self::new(ClusteringSettings {
            k,
            ..ClusteringSettings::default()
        })
    }

    /// Partition `values` into at most `k` clusters.
    pub fn cluster(&self, values: &[f64]) -> Vec<Cluster> {
        self.run(values).clusters
    }

    /// Partition `values` and report iteration statistics.
    ///
    /// With `len(values) <= k` every value becomes its own single-member
    /// cluster, numbered in input order. Otherwise exactly `k` clusters are
    /// returned; clusters that end up with no members report
    /// `min = max = center` and `sample_size = 0`.
    ///
    /// NaN and infinite values are dropped before clustering.
    ///
    /// Hitting the iteration cap is logged as an error and reported through
    /// `converged = false`; the clusters from the last assignment are still
    /// returned.
    pub fn run(&self, values: &[f64]) -> ClusteringResult {
        let k = self.settings.k;
        if k == 0 {
            return ClusteringResult {
                clusters: vec![],
                iterations: 0,
                converged: true,
            };
        }

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() < values.len() {
            debug!(
                "k-means dropped {} non-finite values",
                values.len() - finite.len()
            );
        }
        let values = finite.as_slice();

        if values.len() <= k {
            let clusters = values
                .iter()
                .enumerate()
                .map(|(id, &v)| Cluster {
                    id,
                    center: v,
                    min: v,
                    max: v,
                    sample_size: 1,
                })
                .collect();
            return ClusteringResult {
                clusters,
                iterations: 0,
                converged: true,
            };
        }

        let sorted = sorted_ascending(values);
        let mut centroids: Vec<f64> = sorted[..k].to_vec();
        let mut assignments: Vec<Option<usize>> = vec![None; sorted.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.settings.max_iterations {
            iterations += 1;

            let mut changed = false;
            for (slot, &value) in assignments.iter_mut().zip(sorted.iter()) {
                let nearest = nearest_centroid(value, &centroids);
                if *slot != Some(nearest) {
                    *slot = Some(nearest);
                    changed = true;
                }
            }

            if !changed {
                converged = true;
                break;
            }

            for (j, centroid) in centroids.iter_mut().enumerate() {
                let (sum, count) = sorted
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, a)| **a == Some(j))
                    .fold((0.0, 0usize), |(sum, count), (v, _)| (sum + v, count + 1));
                if count > 0 {
                    *centroid = sum / count as f64;
                }
            }
        }

        if converged {
            debug!(
                "k-means converged after {} iterations, centroids {:?}",
                iterations, centroids
            );
        } else {
            error!(
                "k-means did not converge within {} iterations (k={}, n={})",
                self.settings.max_iterations,
                k,
                sorted.len()
            );
        }

        let clusters = centroids
            .iter()
            .enumerate()
            .map(|(id, &centroid)| {
                let members: Vec<f64> = sorted
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, a)| **a == Some(id))
                    .map(|(v, _)| *v)
                    .collect();
                summarize(id, centroid, &members)
            })
            .collect();

        ClusteringResult {
            clusters,
            iterations,
            converged,
        }
    }
}

/// Cluster `values` into `k` buckets with the default iteration cap.
pub fn cluster_values(values: &[f64], k: usize) -> Vec<Cluster> {
    KMeans1D::with_k(k).cluster(values)
}

/// Index of the nearest centroid; the lowest index wins ties.
fn nearest_centroid(value: f64, centroids: &[f64]) -> usize {
    let mut best = 0;
    let mut best_dist = (value - centroids[0]).abs();
    for (idx, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = (value - centroid).abs();
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

fn summarize(id: usize, centroid: f64, members: &[f64]) -> Cluster {
    let center = round_to(centroid, 2);
    if members.is_empty() {
        return Cluster {
            id,
            center,
            min: center,
            max: center,
            sample_size: 0,
        };
    }

    let min = members.iter().copied().fold(f64::INFINITY, f64::min);
    let max = members.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Cluster {
        id,
        center,
        min: round_to(min, 2),
        max: round_to(max, 2),
        sample_size: members.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_values_than_k_gives_singletons_in_input_order() {
        let clusters = cluster_values(&[30.0, 10.0], 3);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].center, 30.0);
        assert_eq!(clusters[1].center, 10.0);
        assert!(clusters.iter().all(|c| c.sample_size == 1));
        assert!(clusters.iter().all(|c| c.min == c.center && c.max == c.center));
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_values(&[], 3).is_empty());
    }

    #[test]
    fn test_zero_k() {
        assert!(cluster_values(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_smallest_value_seeding() {
        // Seeds 10.0, 10.2, 10.4 all start in the lowest group, so the two
        // upper groups end up sharing the last cluster.
        let values = [30.1, 10.0, 20.2, 10.4, 29.9, 19.8, 10.2, 30.0, 20.0];
        let result = KMeans1D::with_k(3).run(&values);

        assert!(result.converged);
        assert_eq!(result.iterations, 3);
        let clusters = &result.clusters;
        assert_eq!(clusters.len(), 3);

        assert_eq!(clusters[0].center, 10.0);
        assert_eq!(clusters[0].sample_size, 1);

        assert_eq!(clusters[1].center, 10.3);
        assert_eq!(clusters[1].min, 10.2);
        assert_eq!(clusters[1].max, 10.4);
        assert_eq!(clusters[1].sample_size, 2);

        assert_eq!(clusters[2].center, 25.0);
        assert_eq!(clusters[2].min, 19.8);
        assert_eq!(clusters[2].max, 30.1);
        assert_eq!(clusters[2].sample_size, 6);
    }

    #[test]
    fn test_duplicate_seeds_leave_empty_cluster() {
        // Seeds are [1, 1, 1]; every value ties to cluster 0 first.
        let values = [1.0, 1.0, 1.0, 1.0];
        let clusters = cluster_values(&values, 3);
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].sample_size, 4);
        assert_eq!(clusters[1].sample_size, 0);
        assert_eq!(clusters[1].min, clusters[1].center);
        assert_eq!(clusters[1].max, clusters[1].center);
    }

    #[test]
    fn test_repeated_seed_can_leave_centers_unordered() {
        // Seeds [1, 1, 1]: the first pass sends everything, 5 included, to
        // cluster 0 (center 1.8). The 1s then move to cluster 1 and cluster 0
        // settles on 5 while cluster 2 stays empty at its seed.
        let result = KMeans1D::with_k(3).run(&[1.0, 1.0, 1.0, 1.0, 5.0]);
        assert!(result.converged);
        assert_eq!(result.iterations, 3);

        let centers: Vec<f64> = result.clusters.iter().map(|c| c.center).collect();
        let sizes: Vec<usize> = result.clusters.iter().map(|c| c.sample_size).collect();
        assert_eq!(centers, vec![5.0, 1.0, 1.0]);
        assert_eq!(sizes, vec![1, 4, 0]);
    }

    #[test]
    fn test_distinct_seeds_give_ordered_centers() {
        let values = [2.0, 7.5, 3.1, 12.0, 1.0, 8.2, 11.4, 2.2, 7.9];
        let centers: Vec<f64> = cluster_values(&values, 3).iter().map(|c| c.center).collect();
        assert!(centers.windows(2).all(|w| w[0] <= w[1]), "{:?}", centers);
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let mut values: Vec<f64> = (0..40)
            .map(|i| if i % 3 == 0 { f64::NAN } else { i as f64 })
            .collect();
        values[1] = f64::INFINITY;

        let clusters = cluster_values(&values, 3);
        assert_eq!(clusters.len(), 3);
        // 14 NaN and one infinity removed
        assert_eq!(clusters.iter().map(|c| c.sample_size).sum::<usize>(), 25);
        assert!(clusters.iter().all(|c| c.center.is_finite()));

        let clusters = cluster_values(&[f64::NAN, 2.0, f64::NEG_INFINITY], 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].center, 2.0);
    }

    #[test]
    fn test_centers_rounded_to_two_places() {
        let values = [1.0, 1.0, 2.0, 10.0, 10.001, 10.002];
        let clusters = cluster_values(&values, 2);
        for c in &clusters {
            assert_eq!(c.center, round_to(c.center, 2));
        }
        assert_eq!(clusters.iter().map(|c| c.sample_size).sum::<usize>(), 6);
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let a = [5.0, 1.0, 9.0, 2.0, 8.0, 4.0, 7.0];
        let mut b = a;
        b.reverse();
        assert_eq!(cluster_values(&a, 3), cluster_values(&b, 3));
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let kmeans = KMeans1D::new(ClusteringSettings {
            k: 2,
            max_iterations: 1,
        });
        let result = kmeans.run(&[1.0, 2.0, 3.0, 10.0, 11.0]);
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.clusters.len(), 2);
    }

    #[test]
    fn test_nearest_centroid_tie_goes_to_lowest_index() {
        assert_eq!(nearest_centroid(5.0, &[4.0, 6.0]), 0);
        assert_eq!(nearest_centroid(5.9, &[4.0, 6.0]), 1);
    }
}
