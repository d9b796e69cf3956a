//! A `Dataset` is an ordered collection of `Instance`s sharing one `Header`.

use serde::{Deserialize, Serialize};

use crate::Error;

use super::{Header, Instance, Value};

/// An ordered collection of `Instance`s sharing one `Header`.
///
/// Every instance is checked against the header when it is added, so code
/// that reads from a `Dataset` may assume that each instance has one value
/// per attribute and that every value fits its attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// The schema of the dataset.
    header: Header,
    /// The instances in the dataset.
    instances: Vec<Instance>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Errors
    ///
    /// * If any instance does not fit the header, including numeric values
    ///   that are not finite.
    pub fn new(header: Header, instances: Vec<Instance>) -> Result<Self, Error> {
        for (i, instance) in instances.iter().enumerate() {
            header
                .check_values(instance.values())
                .map_err(|e| Error::InvalidDataset(format!("instance {i}: {e}")))?;
        }
        Ok(Self { header, instances })
    }

    /// Creates a `Dataset` with the same header as `self` and no instances.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            header: self.header.clone(),
            instances: Vec::new(),
        }
    }

    /// Appends an instance.
    ///
    /// # Errors
    ///
    /// * If the instance does not fit the header.
    pub fn push(&mut self, instance: Instance) -> Result<(), Error> {
        self.header.check_values(instance.values())?;
        self.instances.push(instance);
        Ok(())
    }

    /// Appends an instance that was already checked against this header.
    pub(crate) fn push_unchecked(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// The name of the dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.header.name()
    }

    /// The schema of the dataset.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The instances in the dataset.
    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Returns the instance at `index`.
    ///
    /// # Panics
    ///
    /// * If `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> &Instance {
        &self.instances[index]
    }

    /// The number of instances.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.instances.len()
    }

    /// Whether the dataset has no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The class label of the instance at `index`, or `None` if the class
    /// value is missing.
    #[must_use]
    pub fn class_label(&self, index: usize) -> Option<usize> {
        self.instances[index]
            .value(self.header.class_index())
            .and_then(Value::as_nominal)
    }

    /// The number of instances with each class label, indexed by label.
    /// Instances with a missing class are not counted.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.header.class_labels().len()];
        for i in 0..self.cardinality() {
            if let Some(c) = self.class_label(i) {
                counts[c] += 1;
            }
        }
        counts
    }

    /// Checks that the dataset can be used for neighbor search.
    ///
    /// # Errors
    ///
    /// * If the dataset is empty.
    /// * If the dataset has no attributes besides the class.
    pub fn check_searchable(&self) -> Result<(), Error> {
        if self.is_empty() {
            Err(Error::InvalidDataset(format!("`{}` has no instances", self.name())))
        } else if self.header.num_features() == 0 {
            Err(Error::InvalidDataset(format!(
                "`{}` has no attributes besides the class",
                self.name()
            )))
        } else {
            Ok(())
        }
    }

    /// The minimum and maximum of every attribute.
    ///
    /// Nominal attributes, the class, and attributes whose values are all
    /// missing get `None`.
    #[must_use]
    pub fn ranges(&self) -> Vec<Option<(f64, f64)>> {
        let mut ranges = vec![None; self.header.num_attributes()];
        for (j, attribute) in self.header.features() {
            if attribute.is_nominal() {
                continue;
            }
            ranges[j] = self
                .instances
                .iter()
                .filter_map(|inst| inst.value(j).and_then(Value::as_numeric))
                .fold(None, |acc: Option<(f64, f64)>, v| {
                    Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
                });
        }
        ranges
    }
}
