//! A single labeled row of a `Dataset`.

use serde::{Deserialize, Serialize};

use super::Value;

/// An ordered vector of attribute values, including the class value.
///
/// An `Instance` does not know its own schema. It is validated against a
/// `Header` when it is added to a `Dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// One value per attribute of the schema.
    values: Vec<Value>,
}

impl Instance {
    /// Creates a new `Instance` from its values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// All values, including the class value.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The value at the given attribute position, if it exists.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the instance has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Instance {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
