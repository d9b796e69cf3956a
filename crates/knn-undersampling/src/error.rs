//! Errors raised while undersampling a dataset.

/// The errors that can occur during a filtering pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The dataset cannot be searched or filtered.
    ///
    /// * It is empty or has no attributes besides the class.
    /// * Its class attribute is missing or not nominal.
    /// * One of its instances does not fit the schema.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// A single neighbor query failed.
    ///
    /// The decider recovers from this per instance, so it only reaches the
    /// caller when a search is queried directly.
    #[error("neighbor query failed: {0}")]
    NeighborQuery(String),

    /// The parameters do not make sense for the given dataset.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
