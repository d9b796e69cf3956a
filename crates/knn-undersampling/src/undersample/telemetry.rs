//! Events emitted by a `Filter` and the subscribers that receive them.

use std::{sync::mpsc::Sender, time::Duration};

use serde::{Deserialize, Serialize};

/// A summary of one filtering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// The name of the input dataset.
    pub dataset: String,
    /// The name of the neighbor search used.
    pub search: String,
    /// The number of input instances.
    pub input_size: usize,
    /// The number of output instances.
    pub output_size: usize,
    /// The number of instances removed.
    pub removed: usize,
    /// The number of majority-class instances considered for removal.
    pub candidates: usize,
    /// The number of majority-class instances whose neighbor query failed.
    pub unevaluated: usize,
    /// Wall-clock time of the pass.
    pub elapsed: Duration,
}

/// Something that happened during a filtering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A pass began.
    Started {
        /// The name of the input dataset.
        dataset: String,
        /// The number of input instances.
        cardinality: usize,
        /// The name of the neighbor search used.
        search: String,
    },
    /// Some majority-class instances could not be evaluated and were kept.
    Unevaluated {
        /// The name of the input dataset.
        dataset: String,
        /// The indices of the instances.
        indices: Vec<usize>,
    },
    /// A pass completed.
    Finished(FilterReport),
}

/// Receives the events of a filtering pass.
///
/// Subscribers are called on the filtering thread after the relevant work is
/// done. They cannot change the output, but a slow subscriber delays the
/// return of the pass, so anything expensive should hand the event off, e.g.
/// with a [`ChannelSubscriber`].
pub trait Subscriber: Send + Sync {
    /// Handles an event.
    fn notify(&self, event: &Event);
}

impl<F: Fn(&Event) + Send + Sync> Subscriber for F {
    fn notify(&self, event: &Event) {
        self(event);
    }
}

/// Writes every event to the log.
pub struct LogSubscriber;

impl Subscriber for LogSubscriber {
    fn notify(&self, event: &Event) {
        match event {
            Event::Started {
                dataset,
                cardinality,
                search,
            } => ftlog::info!("Filtering `{dataset}` ({cardinality} instances) with {search}"),
            Event::Unevaluated { dataset, indices } => {
                ftlog::warn!("{} instances of `{dataset}` could not be evaluated: {indices:?}", indices.len());
            }
            Event::Finished(report) => ftlog::info!(
                "Filtered `{}`: removed {} of {} candidates, {} -> {} instances in {:.3} s ({} unevaluated)",
                report.dataset,
                report.removed,
                report.candidates,
                report.input_size,
                report.output_size,
                report.elapsed.as_secs_f64(),
                report.unevaluated
            ),
        }
    }
}

/// Forwards every event over a channel, so the receiving end decides when and
/// how to present it.
pub struct ChannelSubscriber(std::sync::Mutex<Sender<Event>>);

impl ChannelSubscriber {
    /// Creates a subscriber that sends to `sender`.
    pub const fn new(sender: Sender<Event>) -> Self {
        Self(std::sync::Mutex::new(sender))
    }
}

impl Subscriber for ChannelSubscriber {
    fn notify(&self, event: &Event) {
        // A hung-up receiver means nobody is listening any more.
        if let Ok(sender) = self.0.lock() {
            let _ = sender.send(event.clone());
        }
    }
}
