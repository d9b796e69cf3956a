//! Encoding instances as points that a `Metric` can measure.

use distances::Number;

use crate::Error;

use super::{Dataset, Instance, Value};

/// How an encoded coordinate is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    /// A numeric or date attribute, scaled into `[0, 1]`.
    Scaled,
    /// A nominal attribute, holding its label index.
    Label,
}

/// The non-class attributes of a `Dataset`, with the ranges needed to scale
/// them.
///
/// Each instance is encoded as one `f64` per non-class attribute, in schema
/// order:
///
/// * numeric and date values become `(v - min) / (max - min)`, clamped into
///   `[0, 1]`. An attribute with a single distinct value encodes as `0`.
/// * nominal values become their label index.
/// * missing values become `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    /// Positions of the non-class attributes in the schema.
    positions: Vec<usize>,
    /// How each coordinate is compared.
    coordinates: Vec<Coordinate>,
    /// The `(min, max)` of each scaled coordinate, if any value was present.
    ranges: Vec<Option<(f64, f64)>>,
    /// The number of attributes, including the class, an instance must have.
    arity: usize,
}

impl FeatureSpace {
    /// Learns the coordinates and ranges from `data`.
    ///
    /// # Errors
    ///
    /// * If `data` is empty or has no attributes besides the class.
    pub fn fit(data: &Dataset) -> Result<Self, Error> {
        data.check_searchable()?;

        let header = data.header();
        let all_ranges = data.ranges();
        let (positions, (coordinates, ranges)): (Vec<_>, (Vec<_>, Vec<_>)) = header
            .features()
            .map(|(j, a)| {
                let c = if a.is_nominal() {
                    Coordinate::Label
                } else {
                    Coordinate::Scaled
                };
                (j, (c, all_ranges[j]))
            })
            .unzip();

        Ok(Self {
            positions,
            coordinates,
            ranges,
            arity: header.num_attributes(),
        })
    }

    /// The number of coordinates of an encoded point.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.coordinates.len()
    }

    /// How each coordinate is compared.
    #[must_use]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Whether every coordinate is scaled, i.e. there are no nominal
    /// attributes.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.coordinates.iter().all(|&c| c == Coordinate::Scaled)
    }

    /// Encodes an instance as a point.
    ///
    /// # Errors
    ///
    /// * If the instance has the wrong number of values.
    /// * If a value does not match the kind of its attribute or is not finite.
    pub fn encode(&self, instance: &Instance) -> Result<Vec<f64>, Error> {
        if instance.len() != self.arity {
            return Err(Error::NeighborQuery(format!(
                "expected {} values but found {}",
                self.arity,
                instance.len()
            )));
        }

        self.positions
            .iter()
            .zip(self.coordinates.iter().zip(&self.ranges))
            .map(|(&j, (&c, range))| match (c, instance.values()[j]) {
                (_, Value::Missing) => Ok(f64::NAN),
                (Coordinate::Label, Value::Nominal(l)) => Ok(l.as_f64()),
                (Coordinate::Scaled, Value::Numeric(v)) if v.is_finite() => Ok(scale(v, *range)),
                (_, v) => Err(Error::NeighborQuery(format!(
                    "value {v:?} at attribute {j} is not a finite value of its kind"
                ))),
            })
            .collect()
    }

    /// Encodes every instance of `data`.
    ///
    /// # Errors
    ///
    /// See [`FeatureSpace::encode`].
    pub fn encode_all(&self, data: &Dataset) -> Result<Vec<Vec<f64>>, Error> {
        data.instances()
            .iter()
            .map(|inst| self.encode(inst))
            .collect::<Result<_, _>>()
            .map_err(|e| Error::InvalidDataset(e.to_string()))
    }
}

/// Scales `v` into `[0, 1]` using the given range.
fn scale(v: f64, range: Option<(f64, f64)>) -> f64 {
    match range {
        Some((lo, hi)) if hi > lo => ((v - lo) / (hi - lo)).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
