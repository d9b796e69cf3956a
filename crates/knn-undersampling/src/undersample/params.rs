//! Parameters for a filtering pass.

use core::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{core::Header, search::SelfMatch, Error};

/// Identifies one label of the class attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    /// The position of the label, starting at 0.
    Index(usize),
    /// The label itself.
    Name(String),
}

impl Default for ClassLabel {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl ClassLabel {
    /// Returns the position of this label in the class attribute of `header`.
    ///
    /// An `Index` whose digits spell one of the labels resolves to that label,
    /// so `0` names the label `"0"` even when it is not the first one.
    /// Otherwise it is a position.
    ///
    /// # Errors
    ///
    /// * If the class attribute has no such label.
    pub fn resolve(&self, header: &Header) -> Result<usize, Error> {
        let labels = header.class_labels();
        match self {
            Self::Index(i) => match header.class_attribute().label_index(&i.to_string()) {
                Some(j) => {
                    if j != *i {
                        ftlog::warn!("Class `{i}` is the label at position {j}, not the label at position {i}");
                    }
                    Ok(j)
                }
                None if *i < labels.len() => Ok(*i),
                None => Err(Error::Configuration(format!(
                    "class index {i} is out of bounds for {} labels {labels:?}",
                    labels.len()
                ))),
            },
            Self::Name(name) => header.class_attribute().label_index(name).ok_or_else(|| {
                Error::Configuration(format!("`{name}` is not one of the class labels {labels:?}"))
            }),
        }
    }
}

impl FromStr for ClassLabel {
    type Err = Infallible;

    /// Parses as an index if possible, and as a name otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse().map_or_else(|_| Self::Name(s.to_string()), Self::Index))
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Parameters for a filtering pass.
///
/// Missing fields take their default values when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// The number of nearest neighbors to examine. Default 5.
    pub k: usize,
    /// The minimum number of neighbors from other classes for an instance to
    /// be removed. Default 1.
    pub threshold: usize,
    /// The class whose instances may be removed. Default is the first label.
    pub majority_label: ClassLabel,
    /// Whether an instance may be its own neighbor. Default `Exclude`.
    pub self_match: SelfMatch,
    /// Whether to evaluate instances in parallel. Default `false`.
    pub parallel: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            k: 5,
            threshold: 1,
            majority_label: ClassLabel::default(),
            self_match: SelfMatch::default(),
            parallel: false,
        }
    }
}

impl Params {
    /// Sets the number of nearest neighbors.
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the removal threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the majority class.
    #[must_use]
    pub fn with_majority_label(mut self, majority_label: ClassLabel) -> Self {
        self.majority_label = majority_label;
        self
    }

    /// Sets whether an instance may be its own neighbor.
    #[must_use]
    pub const fn with_self_match(mut self, self_match: SelfMatch) -> Self {
        self.self_match = self_match;
        self
    }

    /// Sets whether to evaluate instances in parallel.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks the parameters against a schema and returns the index of the
    /// majority label.
    ///
    /// # Errors
    ///
    /// * If `k` is zero.
    /// * If the majority label is not a label of the class attribute.
    pub fn validate(&self, header: &Header) -> Result<usize, Error> {
        if self.k == 0 {
            return Err(Error::Configuration("k must be positive".to_string()));
        }
        self.majority_label.resolve(header)
    }

    /// Renders the parameters as command-line flags, e.g.
    /// `["-k", "5", "-t", "1", "-w", "0"]`.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-k".to_string(),
            self.k.to_string(),
            "-t".to_string(),
            self.threshold.to_string(),
            "-w".to_string(),
            self.majority_label.to_string(),
        ];
        if self.self_match == SelfMatch::Include {
            args.push("--include-self".to_string());
        }
        if self.parallel {
            args.push("--parallel".to_string());
        }
        args
    }
}
