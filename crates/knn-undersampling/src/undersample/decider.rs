//! Deciding which majority-class instances to remove.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::{
    core::Dataset,
    search::{NeighborSearch, SelfMatch},
    Error,
};

use super::Params;

/// The indices of the instances chosen for removal in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSet {
    /// The instances to remove.
    removed: BTreeSet<usize>,
    /// Majority instances whose neighbor query failed. They are kept.
    unevaluated: Vec<usize>,
    /// The number of majority instances considered.
    candidates: usize,
}

impl RemovalSet {
    /// Whether the instance at `index` is to be removed.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.removed.contains(&index)
    }

    /// The number of instances to remove.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    /// Whether nothing is to be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    /// The indices to remove, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.removed.iter().copied()
    }

    /// Majority instances that could not be evaluated, in increasing order.
    #[must_use]
    pub fn unevaluated(&self) -> &[usize] {
        &self.unevaluated
    }

    /// The number of majority instances that were considered for removal.
    #[must_use]
    pub const fn num_candidates(&self) -> usize {
        self.candidates
    }
}

/// The outcome of examining one instance.
enum Decision {
    /// Not of the majority class.
    Skip,
    /// Of the majority class, with too few neighbors from other classes.
    Keep,
    /// Of the majority class, with enough neighbors from other classes.
    Remove,
    /// Of the majority class, but its neighbors could not be found.
    Unevaluated(Error),
}

/// Decides which instances of the majority class to remove.
///
/// An instance of the majority class is removed when at least `threshold`
/// of its `k` nearest neighbors, drawn from the whole dataset, have a
/// different class label. An instance with a missing class label is never
/// removed, but it does count as a neighbor from a different class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndersamplingDecider {
    /// The index of the majority label.
    majority: usize,
    /// The number of neighbors to examine.
    k: usize,
    /// The minimum number of neighbors from other classes for removal.
    threshold: usize,
    /// Whether an instance may be its own neighbor.
    self_match: SelfMatch,
}

impl UndersamplingDecider {
    /// Creates a decider for datasets with the given class labels.
    ///
    /// # Errors
    ///
    /// See [`Params::validate`].
    pub fn new(params: &Params, data: &Dataset) -> Result<Self, Error> {
        let majority = params.validate(data.header())?;
        Ok(Self {
            majority,
            k: params.k,
            threshold: params.threshold,
            self_match: params.self_match,
        })
    }

    /// Prepares `search` over `data` and returns the instances to remove.
    ///
    /// # Errors
    ///
    /// * If `search` cannot be prepared over `data`.
    pub fn compute_removal_set<S: NeighborSearch + ?Sized>(
        &self,
        search: &mut S,
        data: &Dataset,
    ) -> Result<RemovalSet, Error> {
        search.prepare(data)?;
        let decisions = (0..data.cardinality()).map(|i| (i, self.decide(&*search, data, i)));
        Ok(self.collect(data, decisions))
    }

    /// Parallel version of [`UndersamplingDecider::compute_removal_set`].
    ///
    /// Gives the same result as the sequential version.
    ///
    /// # Errors
    ///
    /// See [`UndersamplingDecider::compute_removal_set`].
    pub fn par_compute_removal_set<S: NeighborSearch + ?Sized>(
        &self,
        search: &mut S,
        data: &Dataset,
    ) -> Result<RemovalSet, Error> {
        search.prepare(data)?;
        let search = &*search;
        let decisions = (0..data.cardinality())
            .into_par_iter()
            .map(|i| (i, self.decide(search, data, i)))
            .collect::<Vec<_>>();
        Ok(self.collect(data, decisions))
    }

    /// Whether enough of the given neighbors have a class other than the
    /// majority.
    #[must_use]
    pub fn should_remove(&self, data: &Dataset, neighbors: &[(usize, f64)]) -> bool {
        let minority = neighbors
            .iter()
            .filter(|&&(j, _)| data.class_label(j) != Some(self.majority))
            .count();
        minority >= self.threshold
    }

    /// Examines the instance at `index`.
    fn decide<S: NeighborSearch + ?Sized>(&self, search: &S, data: &Dataset, index: usize) -> Decision {
        if data.class_label(index) != Some(self.majority) {
            return Decision::Skip;
        }
        match search.query_indexed(index, self.k, self.self_match) {
            Ok(neighbors) if self.should_remove(data, &neighbors) => Decision::Remove,
            Ok(_) => Decision::Keep,
            Err(e) => Decision::Unevaluated(e),
        }
    }

    /// Gathers decisions, in index order, into a `RemovalSet`.
    fn collect<I: IntoIterator<Item = (usize, Decision)>>(&self, data: &Dataset, decisions: I) -> RemovalSet {
        let mut set = RemovalSet::default();
        for (i, decision) in decisions {
            match decision {
                Decision::Skip => continue,
                Decision::Keep => (),
                Decision::Remove => {
                    set.removed.insert(i);
                }
                Decision::Unevaluated(e) => {
                    ftlog::warn!("Could not evaluate instance {i} of `{}`: {e}", data.name());
                    set.unevaluated.push(i);
                }
            }
            set.candidates += 1;
        }
        ftlog::debug!(
            "Chose {} of {} majority instances of `{}` for removal with k = {} and threshold = {}",
            set.removed.len(),
            set.candidates,
            data.name(),
            self.k,
            self.threshold
        );
        set
    }
}
