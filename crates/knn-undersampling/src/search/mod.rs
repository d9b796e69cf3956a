//! k-nearest-neighbor search over a `Dataset`.

use serde::{Deserialize, Serialize};

use crate::{
    core::{metric::Metric, Dataset, FeatureSpace, Instance},
    Error,
};

mod ball_tree;
mod linear;

pub use ball_tree::BallTree;
pub use linear::LinearSearch;

/// Whether a query by index may return the queried instance itself.
///
/// This is identity by position in the prepared dataset, not value equality:
/// with `Exclude`, duplicates of the queried instance at other positions are
/// still returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfMatch {
    /// The queried instance competes with all others and, being at distance
    /// zero, is usually its own first neighbor.
    Include,
    /// The queried instance is skipped, so up to `k` other instances are
    /// returned.
    #[default]
    Exclude,
}

/// A search for the `k` nearest instances of a prepared `Dataset`.
///
/// Results are pairs of `(index, distance)` sorted by increasing distance,
/// with ties broken by increasing index. If the dataset has fewer than `k`
/// candidates, all of them are returned.
pub trait NeighborSearch: Send + Sync {
    /// The name of the search.
    fn name(&self) -> &str;

    /// Checks that the search can run at all, before any dataset is seen.
    ///
    /// # Errors
    ///
    /// * If the search is misconfigured, e.g. paired with a metric it cannot
    ///   prune with.
    fn check(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Prepares the search over `data`, replacing any previous preparation.
    ///
    /// # Errors
    ///
    /// * If `data` is empty or has no attributes besides the class.
    /// * If `check` fails.
    fn prepare(&mut self, data: &Dataset) -> Result<(), Error>;

    /// Returns the `k` nearest neighbors of an arbitrary instance.
    ///
    /// No instance is skipped, even one equal to `query`.
    ///
    /// # Errors
    ///
    /// * If the search has not been prepared.
    /// * If `query` does not fit the schema of the prepared dataset.
    fn query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error>;

    /// Returns the `k` nearest neighbors of the instance at `index` in the
    /// prepared dataset.
    ///
    /// # Errors
    ///
    /// * If the search has not been prepared.
    /// * If `index` is out of bounds.
    fn query_indexed(&self, index: usize, k: usize, self_match: SelfMatch) -> Result<Vec<(usize, f64)>, Error>;
}

impl NeighborSearch for Box<dyn NeighborSearch> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&self) -> Result<(), Error> {
        (**self).check()
    }

    fn prepare(&mut self, data: &Dataset) -> Result<(), Error> {
        (**self).prepare(data)
    }

    fn query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error> {
        (**self).query(query, k)
    }

    fn query_indexed(&self, index: usize, k: usize, self_match: SelfMatch) -> Result<Vec<(usize, f64)>, Error> {
        (**self).query_indexed(index, k, self_match)
    }
}

/// The encoded points of a prepared dataset.
pub(crate) struct Points {
    /// How the points were encoded.
    space: FeatureSpace,
    /// One encoded point per instance.
    points: Vec<Vec<f64>>,
}

impl Points {
    /// Encodes every instance of `data`.
    pub(crate) fn new(data: &Dataset) -> Result<Self, Error> {
        let space = FeatureSpace::fit(data)?;
        let points = space.encode_all(data)?;
        Ok(Self { space, points })
    }

    /// The number of points.
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// The point at `index`.
    pub(crate) fn point(&self, index: usize) -> Result<&[f64], Error> {
        self.points.get(index).map(Vec::as_slice).ok_or_else(|| {
            Error::NeighborQuery(format!(
                "index {index} is out of bounds for {} instances",
                self.points.len()
            ))
        })
    }

    /// Encodes an instance that is not part of the prepared dataset.
    pub(crate) fn encode(&self, query: &Instance) -> Result<Vec<f64>, Error> {
        self.space.encode(query)
    }

    /// The distance from an encoded point to the point at `index`.
    pub(crate) fn distance_to<M: Metric>(&self, metric: &M, query: &[f64], index: usize) -> f64 {
        metric.distance(self.space.coordinates(), query, &self.points[index])
    }

    /// The distance between two prepared points.
    pub(crate) fn distance_between<M: Metric>(&self, metric: &M, a: usize, b: usize) -> f64 {
        metric.distance(self.space.coordinates(), &self.points[a], &self.points[b])
    }
}

/// The error for querying a search that was never prepared.
pub(crate) fn unprepared(name: &str) -> Error {
    Error::NeighborQuery(format!("{name} was queried before `prepare` was called"))
}

/// Returns `Some(index)` if `index` should be skipped.
pub(crate) const fn skipped(index: usize, self_match: SelfMatch) -> Option<usize> {
    match self_match {
        SelfMatch::Include => None,
        SelfMatch::Exclude => Some(index),
    }
}
