//! The data model: attributes, instances, datasets, and the metrics that
//! measure them.

mod attribute;
mod dataset;
pub mod feature_space;
mod instance;
pub mod metric;
mod sized_heap;

pub use attribute::{Attribute, AttributeKind, Header, Value};
pub use dataset::Dataset;
pub use feature_space::FeatureSpace;
pub use instance::Instance;
pub use metric::Metric;
pub use sized_heap::SizedHeap;
