#![doc = include_str!("../README.md")]

pub mod core;
mod error;
pub mod search;
pub mod undersample;

pub use error::Error;
pub use search::{BallTree, LinearSearch, NeighborSearch, SelfMatch};
pub use undersample::{undersample, ClassLabel, Filter, FilterOutput, FilterReport, Params, UndersamplingDecider};

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
