//! The `Euclidean` distance metric.

use super::{all_scaled_and_present, differences, Metric};
use crate::core::feature_space::Coordinate;

/// The heterogeneous `Euclidean` distance metric.
///
/// The square root of the sum of squared per-attribute differences, where
/// nominal attributes differ by `0` or `1` and scaled attributes by their
/// absolute difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn name(&self) -> &str {
        "euclidean"
    }

    fn distance(&self, coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> f64 {
        if all_scaled_and_present(coordinates, a, b) {
            distances::vectors::euclidean(a, b)
        } else {
            differences(coordinates, a, b).map(|d| d * d).sum::<f64>().sqrt()
        }
    }

    fn obeys_triangle_inequality(&self) -> bool {
        true
    }
}
