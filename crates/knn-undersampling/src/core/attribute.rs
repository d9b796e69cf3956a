//! Attributes, values and the schema that ties them together.

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kind of values an `Attribute` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Real-valued.
    Numeric,
    /// Milliseconds since the Unix epoch. Treated numerically for distances.
    Date,
    /// One of a fixed, ordered set of labels.
    Nominal(Vec<String>),
}

/// A named column of a `Dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// The name of the attribute.
    name: String,
    /// The kind of the attribute.
    kind: AttributeKind,
}

impl Attribute {
    /// Creates a numeric attribute.
    pub fn numeric<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Creates a date attribute.
    pub fn date<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Date,
        }
    }

    /// Creates a nominal attribute with the given labels, in order.
    pub fn nominal<S, L, T>(name: S, labels: L) -> Self
    where
        S: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// The name of the attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the attribute.
    #[must_use]
    pub const fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Whether the attribute is nominal.
    #[must_use]
    pub const fn is_nominal(&self) -> bool {
        matches!(self.kind, AttributeKind::Nominal(_))
    }

    /// The labels of a nominal attribute, or `None` for other kinds.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        match &self.kind {
            AttributeKind::Nominal(labels) => Some(labels),
            _ => None,
        }
    }

    /// Returns the index of `label` if this is a nominal attribute that has it.
    #[must_use]
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels()?.iter().position(|l| l == label)
    }

    /// Checks that `value` may be stored in this attribute.
    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (_, Value::Missing) => true,
            (AttributeKind::Numeric | AttributeKind::Date, Value::Numeric(v)) => v.is_finite(),
            (AttributeKind::Nominal(labels), Value::Nominal(i)) => *i < labels.len(),
            _ => false,
        }
    }
}

/// A single cell of an `Instance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A numeric or date value. Datasets only hold finite ones.
    Numeric(f64),
    /// The index of a label of a nominal attribute.
    Nominal(usize),
    /// No value.
    Missing,
}

impl Value {
    /// The numeric value, if there is one.
    #[must_use]
    pub const fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// The nominal index, if there is one.
    #[must_use]
    pub const fn as_nominal(&self) -> Option<usize> {
        match self {
            Self::Nominal(i) => Some(*i),
            _ => None,
        }
    }
}

/// The schema shared by all instances of a `Dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The name of the relation.
    name: String,
    /// The attributes, including the class attribute.
    attributes: Vec<Attribute>,
    /// The position of the class attribute in `attributes`.
    class_index: usize,
}

impl Header {
    /// Creates a new `Header`.
    ///
    /// # Errors
    ///
    /// * If `class_index` is out of bounds.
    /// * If the class attribute is not nominal.
    /// * If the class attribute has no labels.
    pub fn new<S: Into<String>>(name: S, attributes: Vec<Attribute>, class_index: usize) -> Result<Self, Error> {
        let class = attributes.get(class_index).ok_or_else(|| {
            Error::InvalidDataset(format!(
                "class index {class_index} is out of bounds for {} attributes",
                attributes.len()
            ))
        })?;
        match class.labels() {
            None => Err(Error::InvalidDataset(format!(
                "class attribute `{}` is not nominal",
                class.name()
            ))),
            Some([]) => Err(Error::InvalidDataset(format!(
                "class attribute `{}` has no labels",
                class.name()
            ))),
            Some(_) => Ok(Self {
                name: name.into(),
                attributes,
                class_index,
            }),
        }
    }

    /// The name of the relation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes, including the class attribute.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The number of attributes, including the class attribute.
    #[must_use]
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// The position of the class attribute.
    #[must_use]
    pub const fn class_index(&self) -> usize {
        self.class_index
    }

    /// The class attribute.
    #[must_use]
    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    /// The labels of the class attribute.
    #[must_use]
    pub fn class_labels(&self) -> &[String] {
        self.class_attribute().labels().unwrap_or_default()
    }

    /// Iterates over the positions and attributes that are not the class.
    pub fn features(&self) -> impl Iterator<Item = (usize, &Attribute)> + '_ {
        self.attributes
            .iter()
            .enumerate()
            .filter(move |&(i, _)| i != self.class_index)
    }

    /// The number of attributes that are not the class.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.attributes.len() - 1
    }

    /// Checks that `values` is a valid row for this schema.
    ///
    /// # Errors
    ///
    /// * If the number of values does not match the number of attributes.
    /// * If any value does not fit its attribute.
    pub fn check_values(&self, values: &[Value]) -> Result<(), Error> {
        if values.len() != self.attributes.len() {
            return Err(Error::InvalidDataset(format!(
                "expected {} values but found {}",
                self.attributes.len(),
                values.len()
            )));
        }
        for (a, v) in self.attributes.iter().zip(values) {
            if !a.accepts(v) {
                return Err(Error::InvalidDataset(format!(
                    "value {v:?} does not fit attribute `{}`",
                    a.name()
                )));
            }
        }
        Ok(())
    }
}
