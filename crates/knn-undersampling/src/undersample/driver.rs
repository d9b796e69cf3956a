//! Running a complete filtering pass.

use std::time::Instant;

use crate::{
    core::Dataset,
    search::{LinearSearch, NeighborSearch},
    Error,
};

use super::{
    telemetry::{Event, FilterReport, Subscriber},
    Params, RemovalSet, UndersamplingDecider,
};

/// The result of a filtering pass.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// The retained instances, in their original order.
    pub dataset: Dataset,
    /// The indices, into the input, of the removed instances.
    pub removed: RemovalSet,
    /// A summary of the pass.
    pub report: FilterReport,
}

/// Removes majority-class instances whose neighborhoods are dominated by
/// other classes.
///
/// A `Filter` owns its parameters, the neighbor search, and any telemetry
/// subscribers. It keeps no state between passes other than the last
/// preparation of the search, which the next pass replaces.
pub struct Filter {
    /// The parameters of each pass.
    params: Params,
    /// The neighbor search to prepare over each input.
    search: Box<dyn NeighborSearch>,
    /// Receivers of telemetry events.
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Filter {
    /// Creates a filter that uses a [`LinearSearch`].
    #[must_use]
    pub fn new(params: Params) -> Self {
        Self {
            params,
            search: Box::new(LinearSearch::default()),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the neighbor search.
    #[must_use]
    pub fn with_search<S: NeighborSearch + 'static>(mut self, search: S) -> Self {
        self.search = Box::new(search);
        self
    }

    /// Adds a subscriber for telemetry events.
    #[must_use]
    pub fn with_subscriber<S: Subscriber + 'static>(mut self, subscriber: S) -> Self {
        self.subscribers.push(Box::new(subscriber));
        self
    }

    /// The parameters of each pass.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// The name of the neighbor search.
    #[must_use]
    pub fn search_name(&self) -> &str {
        self.search.name()
    }

    /// Sends an event to every subscriber.
    fn emit(&self, event: &Event) {
        for s in &self.subscribers {
            s.notify(event);
        }
    }

    /// Runs one pass over `input`.
    ///
    /// The output has the same header as `input` and holds, in their original
    /// order, every instance that was not chosen for removal.
    ///
    /// # Errors
    ///
    /// * If `input` is empty or has no attributes besides the class.
    /// * If the parameters are invalid for `input`.
    /// * If the neighbor search is misconfigured.
    /// * If the neighbor search cannot be prepared over `input`.
    pub fn apply(&mut self, input: &Dataset) -> Result<FilterOutput, Error> {
        let start = Instant::now();

        input.check_searchable()?;
        self.search.check()?;
        let decider = UndersamplingDecider::new(&self.params, input)?;

        self.emit(&Event::Started {
            dataset: input.name().to_string(),
            cardinality: input.cardinality(),
            search: self.search.name().to_string(),
        });

        let removed = if self.params.parallel {
            decider.par_compute_removal_set(&mut self.search, input)?
        } else {
            decider.compute_removal_set(&mut self.search, input)?
        };

        let mut dataset = input.empty_like();
        input
            .instances()
            .iter()
            .enumerate()
            .filter(|&(i, _)| !removed.contains(i))
            .for_each(|(_, instance)| dataset.push_unchecked(instance.clone()));

        if !removed.unevaluated().is_empty() {
            self.emit(&Event::Unevaluated {
                dataset: input.name().to_string(),
                indices: removed.unevaluated().to_vec(),
            });
        }

        let report = FilterReport {
            dataset: input.name().to_string(),
            search: self.search.name().to_string(),
            input_size: input.cardinality(),
            output_size: dataset.cardinality(),
            removed: removed.len(),
            candidates: removed.num_candidates(),
            unevaluated: removed.unevaluated().len(),
            elapsed: start.elapsed(),
        };
        ftlog::debug!("{report:?}");
        self.emit(&Event::Finished(report.clone()));

        Ok(FilterOutput {
            dataset,
            removed,
            report,
        })
    }
}

/// Runs one pass with a [`LinearSearch`] and returns only the cleaned dataset.
///
/// # Errors
///
/// See [`Filter::apply`].
pub fn undersample(input: &Dataset, params: &Params) -> Result<Dataset, Error> {
    Filter::new(params.clone()).apply(input).map(|out| out.dataset)
}
