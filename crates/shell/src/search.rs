//! Neighbor searches available in the CLI.

use knn_undersampling::{core::metric::Metric, BallTree, Filter, LinearSearch, Params};

/// The available neighbor searches.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Search {
    /// Exhaustive scan over every instance.
    #[clap(name = "linear")]
    Linear,
    /// Exact search over a tree of balls.
    #[clap(name = "ball-tree")]
    BallTree,
}

impl Search {
    /// Creates a `Filter` that uses this search with the given metric.
    ///
    /// `leaf_size` only applies to the ball tree.
    pub fn filter(self, params: Params, metric: Box<dyn Metric>, leaf_size: usize) -> Filter {
        let filter = Filter::new(params);
        match self {
            Self::Linear => filter.with_search(LinearSearch::new(metric)),
            Self::BallTree => filter.with_search(BallTree::new(metric).with_leaf_size(leaf_size)),
        }
    }
}
