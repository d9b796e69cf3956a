//! The `Manhattan` distance metric.

use super::{all_scaled_and_present, differences, Metric};
use crate::core::feature_space::Coordinate;

/// The heterogeneous `Manhattan` distance metric.
///
/// The sum of per-attribute differences. Cheaper than `Euclidean` and less
/// dominated by a single large difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Metric for Manhattan {
    fn name(&self) -> &str {
        "manhattan"
    }

    fn distance(&self, coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> f64 {
        if all_scaled_and_present(coordinates, a, b) {
            distances::vectors::manhattan(a, b)
        } else {
            differences(coordinates, a, b).sum()
        }
    }

    fn obeys_triangle_inequality(&self) -> bool {
        true
    }
}
