//! The `Metric` trait is used for all distance computations between encoded
//! instances.

use super::feature_space::Coordinate;

mod euclidean;
mod manhattan;

pub use euclidean::Euclidean;
pub use manhattan::Manhattan;

/// A distance function over points encoded by a
/// [`FeatureSpace`](crate::core::FeatureSpace).
///
/// Both points have one coordinate per non-class attribute, described by
/// `coordinates`. Missing values are `NaN`.
///
/// Implementations must be deterministic and symmetric. Indexed searches
/// additionally require the triangle inequality to return exact results.
pub trait Metric: Send + Sync {
    /// The name of the metric.
    fn name(&self) -> &str;

    /// Call the metric on two encoded points.
    fn distance(&self, coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> f64;

    /// Whether the metric satisfies the triangle inequality.
    ///
    /// The triangle inequality is defined as `d(a, b) + d(b, c) >= d(a, c)` for
    /// all points `a`, `b`, and `c`. A [`BallTree`](crate::search::BallTree)
    /// refuses metrics that do not.
    fn obeys_triangle_inequality(&self) -> bool;
}

impl Metric for Box<dyn Metric> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn distance(&self, coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> f64 {
        (**self).distance(coordinates, a, b)
    }

    fn obeys_triangle_inequality(&self) -> bool {
        (**self).obeys_triangle_inequality()
    }
}

/// The per-coordinate differences between two points, each in `[0, 1]`.
///
/// * Two missing values are equal; one missing value differs by `1`.
/// * Labels differ by `0` or `1`.
/// * Scaled values differ by their absolute difference.
pub(crate) fn differences<'a>(
    coordinates: &'a [Coordinate],
    a: &'a [f64],
    b: &'a [f64],
) -> impl Iterator<Item = f64> + 'a {
    coordinates
        .iter()
        .zip(a.iter().zip(b))
        .map(|(c, (&x, &y))| match (x.is_nan(), y.is_nan()) {
            (true, true) => 0.0,
            (true, false) | (false, true) => 1.0,
            (false, false) => match c {
                #[allow(clippy::float_cmp)]
                Coordinate::Label => f64::from(u8::from(x != y)),
                Coordinate::Scaled => (x - y).abs(),
            },
        })
}

/// Whether the fast path over raw coordinates gives the same answer as
/// [`differences`].
pub(crate) fn all_scaled_and_present(coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> bool {
    coordinates.iter().all(|&c| c == Coordinate::Scaled)
        && !a.iter().chain(b).any(|v| v.is_nan())
}
