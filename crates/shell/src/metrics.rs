//! Metrics available in the CLI.

use knn_undersampling::core::metric::{self, Euclidean, Manhattan};

/// The available metrics.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Metric {
    /// Heterogeneous Euclidean distance.
    #[clap(name = "euclidean")]
    Euclidean,
    /// Heterogeneous Manhattan distance.
    #[clap(name = "manhattan")]
    Manhattan,
}

impl Metric {
    /// Get the library `Metric` for the distance function.
    pub fn shell_metric(self) -> Box<dyn metric::Metric> {
        match self {
            Self::Euclidean => Box::new(Euclidean),
            Self::Manhattan => Box::new(Manhattan),
        }
    }
}
