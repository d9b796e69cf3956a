//! Undersampling of majority-class instances by their nearest neighbors.

mod decider;
mod driver;
mod params;
mod telemetry;

pub use decider::{RemovalSet, UndersamplingDecider};
pub use driver::{undersample, Filter, FilterOutput};
pub use params::{ClassLabel, Params};
pub use telemetry::{ChannelSubscriber, Event, FilterReport, LogSubscriber, Subscriber};
