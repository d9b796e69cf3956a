//! k-NN search using a linear scan of the dataset.

use rayon::prelude::*;

use crate::{
    core::{
        metric::{Euclidean, Metric},
        Dataset, Instance, SizedHeap,
    },
    Error,
};

use super::{skipped, unprepared, NeighborSearch, Points, SelfMatch};

/// k-NN search using a linear scan of the dataset.
///
/// Every query measures the distance to every prepared instance. This is the
/// reference against which other searches are checked.
pub struct LinearSearch<M: Metric = Euclidean> {
    /// The metric used to compare instances.
    metric: M,
    /// The encoded dataset, once prepared.
    points: Option<Points>,
}

impl Default for LinearSearch<Euclidean> {
    fn default() -> Self {
        Self::new(Euclidean)
    }
}

impl<M: Metric> LinearSearch<M> {
    /// Creates an unprepared search using the given metric.
    pub const fn new(metric: M) -> Self {
        Self { metric, points: None }
    }

    /// Scans all points, skipping `skip` if given.
    fn scan(&self, points: &Points, query: &[f64], k: usize, skip: Option<usize>) -> Vec<(usize, f64)> {
        (0..points.len())
            .filter(|&i| Some(i) != skip)
            .fold(SizedHeap::new(Some(k)), |mut hits, i| {
                hits.push((points.distance_to(&self.metric, query, i), i));
                hits
            })
            .into_sorted_vec()
            .into_iter()
            .map(|(d, i)| (i, d))
            .collect()
    }

    /// Parallel version of `scan`.
    fn par_scan(&self, points: &Points, query: &[f64], k: usize, skip: Option<usize>) -> Vec<(usize, f64)> {
        (0..points.len())
            .into_par_iter()
            .filter(|&i| Some(i) != skip)
            .fold(
                || SizedHeap::new(Some(k)),
                |mut hits, i| {
                    hits.push((points.distance_to(&self.metric, query, i), i));
                    hits
                },
            )
            .reduce(
                || SizedHeap::new(Some(k)),
                |mut a, b| {
                    a.merge(b);
                    a
                },
            )
            .into_sorted_vec()
            .into_iter()
            .map(|(d, i)| (i, d))
            .collect()
    }

    /// Parallel version of [`NeighborSearch::query`].
    ///
    /// Worth it only for large datasets queried one instance at a time.
    ///
    /// # Errors
    ///
    /// See [`NeighborSearch::query`].
    pub fn par_query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error> {
        let points = self.points.as_ref().ok_or_else(|| unprepared(self.name()))?;
        let query = points.encode(query)?;
        Ok(self.par_scan(points, &query, k, None))
    }
}

impl<M: Metric> NeighborSearch for LinearSearch<M> {
    fn name(&self) -> &str {
        "LinearSearch"
    }

    fn prepare(&mut self, data: &Dataset) -> Result<(), Error> {
        self.points = Some(Points::new(data)?);
        Ok(())
    }

    fn query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error> {
        let points = self.points.as_ref().ok_or_else(|| unprepared(self.name()))?;
        let query = points.encode(query)?;
        Ok(self.scan(points, &query, k, None))
    }

    fn query_indexed(&self, index: usize, k: usize, self_match: SelfMatch) -> Result<Vec<(usize, f64)>, Error> {
        let points = self.points.as_ref().ok_or_else(|| unprepared(self.name()))?;
        let query = points.point(index)?;
        Ok(self.scan(points, query, k, skipped(index, self_match)))
    }
}
